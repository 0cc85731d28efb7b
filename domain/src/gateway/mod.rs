pub mod gemini;
pub mod mailersend;
pub mod ringcentral;
pub mod vision;
pub mod whatsapp;
