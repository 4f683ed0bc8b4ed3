mod like_ledger;
mod like_record;

pub use like_ledger::LikeLedger;
pub use like_record::LikeRecord;
