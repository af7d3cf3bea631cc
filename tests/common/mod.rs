#![allow(dead_code)]

use assert_cmd::Command;
use moodlog::infrastructure::crypto::KdfParams;
use moodlog::infrastructure::FileEntryStore;
use std::path::Path;

pub fn moodlog_cmd() -> Command {
    let mut cmd = Command::cargo_bin("moodlog").unwrap();
    cmd.env_remove("MOODLOG_DIR");
    cmd.env_remove("GEMINI_API_KEY");
    cmd.env_remove("RUST_LOG");
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Cheap key derivation so tests stay fast
pub fn cheap_kdf() -> KdfParams {
    KdfParams::new(1024, 1, 1)
}

/// Write a moodlog.toml using the cheap key derivation
pub fn write_test_config(dir: &Path) {
    std::fs::write(
        dir.join("moodlog.toml"),
        "[store.kdf]\nmemory_kib = 1024\niterations = 1\nparallelism = 1\n",
    )
    .unwrap();
}

pub fn test_store(dir: &Path) -> FileEntryStore {
    FileEntryStore::new(dir.to_path_buf()).with_kdf(cheap_kdf())
}
