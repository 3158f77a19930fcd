pub mod server_header;

pub use server_header::ServerHeader;
