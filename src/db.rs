pub mod user_repo;
pub use user_repo::UserRepository;
pub mod availability_repo;
pub use availability_repo::AvailabilityRepository;
pub mod slot_repo;
pub use slot_repo::SlotRepository;
pub mod reservation_repo;
pub use reservation_repo::ReservationRepository;
pub mod credit_repo;
pub use credit_repo::CreditRepository;
pub mod policy_repo;
pub use policy_repo::PolicyRepository;
pub mod template_repo;
pub use template_repo::TemplateRepository;
pub mod reminder_repo;
pub use reminder_repo::ReminderRepository;
