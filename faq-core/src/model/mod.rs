pub mod faq;
pub mod lang;
pub mod localized;
