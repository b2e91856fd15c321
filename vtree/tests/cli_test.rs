use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

// {type=file, hash=deadbeef, name="A"} without aux data
const FILE_A_HEX: &str = concat!(
    "01",
    "0400",
    "deadbeef",
    "0100",
    "41",
    "ffffffffffffffff",
    "0000000000000000000000000000000000000000",
);

fn get_vtree_cmd() -> Command {
    Command::cargo_bin("vtree").unwrap()
}

#[test]
fn test_mode_posix() {
    get_vtree_cmd()
        .args(["--platform", "posix", "mode", "file"])
        .assert()
        .success()
        .stdout("100644\n");

    get_vtree_cmd()
        .args(["--platform", "posix", "mode", "symlink"])
        .assert()
        .success()
        .stdout("120755\n");
}

#[test]
fn test_mode_windows_symlink_is_file() {
    get_vtree_cmd()
        .args(["--platform", "windows", "mode", "symlink"])
        .assert()
        .success()
        .stdout("100755\n");
}

#[test]
fn test_type_of() {
    get_vtree_cmd()
        .args(["--platform", "posix", "type-of", "100755"])
        .assert()
        .success()
        .stdout("EXECUTABLE_FILE\n");

    get_vtree_cmd()
        .args(["--platform", "windows", "type-of", "100755"])
        .assert()
        .success()
        .stdout("REGULAR_FILE\n");
}

#[test]
fn test_type_of_unsupported() {
    get_vtree_cmd()
        .args(["--platform", "posix", "type-of", "020644"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported mode"));

    get_vtree_cmd()
        .args(["--platform", "windows", "type-of", "120777"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported mode"));
}

#[test]
fn test_unknown_platform() {
    get_vtree_cmd()
        .args(["--platform", "plan9", "mode", "file"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown platform"));
}

#[test]
fn test_encode_hex() {
    get_vtree_cmd()
        .args(["encode", "--hex"])
        .write_stdin(r#"[{"type": "file", "hash": "deadbeef", "name": "A"}]"#)
        .assert()
        .success()
        .stdout(format!("{}\n", FILE_A_HEX));
}

#[test]
fn test_encode_raw_then_decode_file() {
    let temp_dir = TempDir::new().unwrap();
    let input = r#"[
        {"type": "tree", "hash": "0102", "name": "src"},
        {"type": "executable", "hash": "0304", "name": "run.sh", "size": 12,
         "sha1": "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed"}
    ]"#;

    let encoded = get_vtree_cmd()
        .arg("encode")
        .write_stdin(input)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let path = temp_dir.path().join("entries.bin");
    fs::write(&path, &encoded).unwrap();

    get_vtree_cmd()
        .args(["--platform", "posix", "decode"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("d 040755 0102 src size=- sha1=-"))
        .stdout(predicate::str::contains(
            "x 100755 0304 run.sh size=12 sha1=2aae6c35c94fcfb415dbe95f408b9ce91ee846ed",
        ));
}

#[test]
fn test_decode_hex_json() {
    get_vtree_cmd()
        .args(["--json", "decode", "--hex"])
        .write_stdin(FILE_A_HEX)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"entry_type\": \"REGULAR_FILE\""))
        .stdout(predicate::str::contains("\"hash\": \"deadbeef\""))
        .stdout(predicate::str::contains("\"size\"").not());
}

#[test]
fn test_decode_non_utf8_name() {
    get_vtree_cmd()
        .args(["--platform", "posix", "decode", "--hex"])
        .write_stdin(concat!(
            "01",
            "0100",
            "ab",
            "0200",
            "66ff",
            "ffffffffffffffff",
            "0000000000000000000000000000000000000000",
        ))
        .assert()
        .success()
        .stdout("f 100644 ab f\u{fffd} size=- sha1=-\n");
}

#[test]
fn test_decode_truncated() {
    get_vtree_cmd()
        .args(["decode", "--hex"])
        .write_stdin("010400deadbeef")
        .assert()
        .failure()
        .stderr(predicate::str::contains("name size"));
}

#[test]
fn test_encode_rejects_bad_name() {
    get_vtree_cmd()
        .arg("encode")
        .write_stdin(r#"[{"type": "file", "hash": "00", "name": "a/b"}]"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("path separator"));
}

#[test]
fn test_scan() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("hello.txt"), b"hello").unwrap();
    fs::create_dir(temp_dir.path().join("sub")).unwrap();

    get_vtree_cmd()
        .arg("scan")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "hello.txt size=5 sha1=aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d",
        ))
        .stdout(predicate::str::contains(" sub size=- sha1=-"));
}
