pub mod humanize;
pub mod phone;
pub mod rich_text;
pub mod valid_uuid;
