pub use crate::{
    badge::BadgeRecord,
    buf::{Buf20, Buf32},
    constants::UNFURL_BATCH_SIZE,
};
