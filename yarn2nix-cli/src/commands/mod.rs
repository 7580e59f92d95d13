pub mod fix_sha1;
pub mod generate;
