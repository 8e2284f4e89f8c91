//! Database Models

// Serde helpers
pub mod serde_helpers;

// Auth
pub mod user;

// Vendor domain
pub mod upload_log;
pub mod vendor;

// Campaign domain
pub mod campaign;
pub mod response;
pub mod send_log;
pub mod template;

// Forms
pub mod form;

// Re-exports
pub use campaign::{Campaign, CampaignCreate, CampaignId, CampaignStatus, CampaignUpdate};
pub use form::{
    CustomForm, CustomFormCreate, CustomFormUpdate, FieldType, FormField, FormResponse,
    VisibilityRule,
};
pub use response::{CampaignResponse, CampaignResponseUpdate, ResponseStats, ResponseStatus};
pub use send_log::{Channel, SendLog};
pub use template::{
    EmailTemplate, EmailTemplateCreate, EmailTemplateUpdate, WhatsAppTemplate,
    WhatsAppTemplateCreate, WhatsAppTemplateUpdate,
};
pub use upload_log::{UploadErrorType, UploadLog};
pub use user::{User, UserCreate, UserId, UserInfo};
pub use vendor::{MsmeCategory, MsmeStatus, Vendor, VendorCreate, VendorId, VendorUpdate};
