pub mod audit;
pub mod auth;
pub mod availability_service;
pub mod booking_service;
pub mod credit_service;
pub mod mailer;
pub mod policy_service;
pub mod reminder_service;
pub mod slot_service;
pub mod template_service;

pub use auth::AuthService;
pub use availability_service::AvailabilityService;
pub use booking_service::BookingService;
pub use credit_service::CreditService;
pub use policy_service::PolicyService;
pub use reminder_service::ReminderService;
pub use slot_service::SlotService;
pub use template_service::TemplateService;
