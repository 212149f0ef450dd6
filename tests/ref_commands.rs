use assert_fs::prelude::*;
use predicates::prelude::predicate;

mod common;

const OID: &str = "deadbeefdeadbeefdeadbeefdeadbeefdeadbeef";

#[test]
fn rev_parse_resolves_head_through_the_ref_layer() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::init_repository(&dir);

    // HEAD -> refs/heads/master -> OID
    dir.child(".git/refs/heads/master")
        .write_str(&format!("{OID}\n"))?;

    common::silt(&dir)
        .args(["rev-parse", "HEAD"])
        .assert()
        .success()
        .stdout(format!("{OID}\n"));

    Ok(())
}

#[test]
fn rev_parse_follows_a_symref_chain() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::init_repository(&dir);

    dir.child(".git/refs/heads/master")
        .write_str(&format!("{OID}\n"))?;
    dir.child(".git/refs/heads/alias")
        .write_str("ref: refs/heads/master\n")?;

    common::silt(&dir)
        .args(["rev-parse", "alias"])
        .assert()
        .success()
        .stdout(format!("{OID}\n"));

    Ok(())
}

#[test]
fn rev_parse_rejects_ambiguous_prefixes_with_all_candidates(
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::init_repository(&dir);

    let first = "abcd1111111111111111111111111111111111aa";
    let second = "abcd2222222222222222222222222222222222bb";
    for oid in [first, second] {
        dir.child(format!(".git/objects/{}/{}", &oid[..2], &oid[2..]))
            .write_str("")?;
    }

    common::silt(&dir)
        .args(["rev-parse", "abcd"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ambiguous reference"))
        .stderr(predicate::str::contains(first))
        .stderr(predicate::str::contains(second));

    Ok(())
}

#[test]
fn a_short_hex_string_under_four_chars_is_not_a_prefix(
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::init_repository(&dir);

    let oid = "abcd1111111111111111111111111111111111aa";
    dir.child(format!(".git/objects/{}/{}", &oid[..2], &oid[2..]))
        .write_str("")?;

    common::silt(&dir)
        .args(["rev-parse", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no such reference"));

    Ok(())
}

#[test]
fn show_ref_lists_refs_in_sorted_order() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::init_repository(&dir);

    dir.child(".git/refs/heads/zeta")
        .write_str(&format!("{OID}\n"))?;
    dir.child(".git/refs/heads/alpha")
        .write_str(&format!("{OID}\n"))?;

    let listing = common::stdout_of(common::silt(&dir).arg("show-ref"));
    let lines: Vec<&str> = listing.lines().collect();

    assert_eq!(
        lines,
        vec![
            format!("{OID} refs/heads/alpha"),
            format!("{OID} refs/heads/zeta"),
        ]
    );

    Ok(())
}

#[test]
fn lightweight_tags_point_at_the_target_object() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::init_repository(&dir);

    dir.child("data.txt").write_str("tagged content")?;
    let blob = common::hash_object_write(&dir, "blob", "data.txt");

    common::silt(&dir)
        .args(["tag", "v1", &blob])
        .assert()
        .success();

    // the tag resolves straight back to the blob
    common::silt(&dir)
        .args(["rev-parse", "v1"])
        .assert()
        .success()
        .stdout(format!("{blob}\n"));

    let tags = common::stdout_of(common::silt(&dir).arg("tag"));
    assert_eq!(tags, "v1\n");

    Ok(())
}

#[test]
fn annotated_tags_store_a_tag_object() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::init_repository(&dir);

    dir.child("data.txt").write_str("tagged content")?;
    let blob = common::hash_object_write(&dir, "blob", "data.txt");

    common::silt(&dir)
        .args(["tag", "-a", "v2", &blob])
        .assert()
        .success();

    // the ref points at a tag object wrapping the blob
    let payload = common::stdout_of(common::silt(&dir).args(["cat-file", "tag", "v2"]));
    assert!(payload.contains(&format!("object {blob}")));
    assert!(payload.contains("type blob"));
    assert!(payload.contains("tag v2"));
    assert!(payload.contains("tagger "));

    // following the tag lands on the blob
    common::silt(&dir)
        .args(["rev-parse", "--silt-type", "blob", "v2"])
        .assert()
        .success()
        .stdout(format!("{blob}\n"));

    Ok(())
}

#[test]
fn a_name_matching_branch_and_tag_is_ambiguous() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::init_repository(&dir);

    dir.child(".git/refs/heads/shared")
        .write_str("1111111111111111111111111111111111111111\n")?;
    dir.child(".git/refs/tags/shared")
        .write_str("2222222222222222222222222222222222222222\n")?;

    common::silt(&dir)
        .args(["rev-parse", "shared"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ambiguous reference"));

    Ok(())
}
