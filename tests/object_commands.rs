use assert_fs::prelude::*;
use fake::faker::lorem::en::Words;
use fake::Fake;
use flate2::read::ZlibDecoder;
use predicates::prelude::predicate;
use std::io::Read;

mod common;

const HELLO_WORLD_OID: &str = "95d09f2b10159347eece71399a7e2e907ea3df4f";

#[test]
fn hash_object_writes_the_known_blob_id() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::init_repository(&dir);

    dir.child("hello.txt").write_str("hello world")?;

    common::silt(&dir)
        .args(["hash-object", "-w", "hello.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains(HELLO_WORLD_OID));

    // the object file holds the zlib-deflated frame
    let object_file = dir.child(format!(
        ".git/objects/{}/{}",
        &HELLO_WORLD_OID[..2],
        &HELLO_WORLD_OID[2..]
    ));
    object_file.assert(predicate::path::is_file());

    let compressed = std::fs::read(object_file.path())?;
    let mut decoder = ZlibDecoder::new(&compressed[..]);
    let mut frame = Vec::new();
    decoder.read_to_end(&mut frame)?;
    assert_eq!(frame, b"blob 11\0hello world");

    Ok(())
}

#[test]
fn hash_object_without_write_leaves_the_store_untouched(
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::init_repository(&dir);

    dir.child("hello.txt").write_str("hello world")?;

    common::silt(&dir)
        .args(["hash-object", "hello.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains(HELLO_WORLD_OID));

    dir.child(format!(
        ".git/objects/{}/{}",
        &HELLO_WORLD_OID[..2],
        &HELLO_WORLD_OID[2..]
    ))
    .assert(predicate::path::missing());

    Ok(())
}

#[test]
fn cat_file_round_trips_blob_content() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::init_repository(&dir);

    let content = Words(5..10).fake::<Vec<String>>().join(" ");
    dir.child("data.txt").write_str(&content)?;
    let oid = common::hash_object_write(&dir, "blob", "data.txt");

    let printed = common::stdout_of(common::silt(&dir).args(["cat-file", "blob", &oid]));
    assert_eq!(printed, content);

    Ok(())
}

#[test]
fn cat_file_resolves_short_prefixes() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::init_repository(&dir);

    dir.child("hello.txt").write_str("hello world")?;
    common::hash_object_write(&dir, "blob", "hello.txt");

    let printed = common::stdout_of(
        common::silt(&dir).args(["cat-file", "blob", &HELLO_WORLD_OID[..8]]),
    );
    assert_eq!(printed, "hello world");

    Ok(())
}

#[test]
fn cat_file_rejects_an_unknown_name() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::init_repository(&dir);

    common::silt(&dir)
        .args(["cat-file", "blob", "doesnotexist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no such reference"));

    Ok(())
}

#[test]
fn cat_file_reports_a_type_dead_end() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::init_repository(&dir);

    dir.child("data.txt").write_str("just a blob")?;
    let blob = common::hash_object_write(&dir, "blob", "data.txt");

    // a blob can never be coerced to a commit
    common::silt(&dir)
        .args(["cat-file", "commit", &blob])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not resolve to a commit"));

    Ok(())
}

#[test]
fn hash_object_rejects_an_unknown_type() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::init_repository(&dir);

    dir.child("hello.txt").write_str("hello world")?;

    common::silt(&dir)
        .args(["hash-object", "-t", "gadget", "hello.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown object type"));

    Ok(())
}

#[test]
fn repeated_writes_of_the_same_object_are_stable() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::init_repository(&dir);

    dir.child("same.txt").write_str("identical bytes")?;
    let first = common::hash_object_write(&dir, "blob", "same.txt");
    let second = common::hash_object_write(&dir, "blob", "same.txt");

    assert_eq!(first, second);

    Ok(())
}
