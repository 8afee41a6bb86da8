//! Clients for the hosted services behind [`crate::services`].

pub mod resend;
pub mod supabase;
