//! Domain model of the review conversation: stages, collected answers,
//! stored records and the ports the application layer drives.

pub mod conversation;
pub mod ports;
pub mod review;
