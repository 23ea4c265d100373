//! Roundtrip and on-disk shape tests for `conveyor-core` profiles.
//!
//! Each `#[case]` is isolated — no shared state.

use std::path::PathBuf;

use assert_fs::prelude::*;
use conveyor_core::profile::{self, Profile, PROFILE_FILE};
use predicates::prelude::*;
use rstest::rstest;

fn default_profile() -> Profile {
    Profile::default()
}

fn relocated_profile() -> Profile {
    Profile {
        source_dir: PathBuf::from("build/out"),
        dist_dir: PathBuf::from("public/assets"),
        ledger_path: PathBuf::from("state/ledger.json"),
    }
}

fn unicode_profile() -> Profile {
    Profile {
        source_dir: PathBuf::from("ソース"),
        dist_dir: PathBuf::from("раздача"),
        ledger_path: PathBuf::from("状態/ledger.json"),
    }
}

#[rstest]
#[case("defaults", default_profile())]
#[case("relocated", relocated_profile())]
#[case("unicode_paths", unicode_profile())]
fn profile_roundtrip(#[case] label: &str, #[case] profile: Profile) {
    let root = assert_fs::TempDir::new().unwrap();
    profile::save_at(root.path(), &profile)
        .unwrap_or_else(|e| panic!("[{label}] save failed: {e}"));
    let back = profile::load_at(root.path())
        .unwrap_or_else(|e| panic!("[{label}] load failed: {e}"));
    assert_eq!(profile, back, "[{label}] roundtrip mismatch");
}

#[test]
fn saved_profile_is_plain_diffable_yaml() {
    let root = assert_fs::TempDir::new().unwrap();
    profile::save_at(root.path(), &Profile::default()).expect("save");

    root.child(PROFILE_FILE)
        .assert(predicate::str::contains("source_dir: src"))
        .assert(predicate::str::contains("dist_dir: dist"));
}

#[test]
fn init_then_load_gives_defaults() {
    let root = assert_fs::TempDir::new().unwrap();
    let initialized = profile::init_at(root.path(), false).expect("init");
    let loaded = profile::load_at(root.path()).expect("load");
    assert_eq!(initialized, loaded);
    assert_eq!(loaded, Profile::default());
}
