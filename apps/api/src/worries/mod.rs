// Worries and cheers: submission, moderation, and the random draw.
// Everything except handlers is pure and takes its inputs explicitly.

pub mod handlers;
pub mod moderation;
pub mod nickname;
pub mod selection;
