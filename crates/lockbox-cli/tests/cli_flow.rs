use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::Connection;

const PASSWORD: &str = "abc123!";

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_lockbox"))
}

struct Sandbox {
    base: PathBuf,
}

impl Sandbox {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time")
            .as_nanos();
        let base = std::env::temp_dir().join(format!(
            "lockbox_{}_{}_{}",
            prefix,
            std::process::id(),
            nanos
        ));
        std::fs::create_dir_all(base.join("config")).expect("create config dir");
        std::fs::create_dir_all(base.join("data")).expect("create data dir");
        Self { base }
    }

    fn store_path(&self) -> PathBuf {
        self.base.join("data").join("lockbox").join("vault.sqlite3")
    }

    fn command(&self, password: Option<&str>) -> Command {
        let mut cmd = Command::new(bin());
        cmd.env("XDG_CONFIG_HOME", self.base.join("config"))
            .env("XDG_DATA_HOME", self.base.join("data"))
            .env("NO_COLOR", "1")
            .env_remove("LOCKBOX_STORE")
            .env_remove("LOCKBOX_CONFIG")
            .env_remove("LOCKBOX_LOG")
            .stdin(Stdio::null());
        match password {
            Some(value) => cmd.env("LOCKBOX_PASSWORD", value),
            None => cmd.env_remove("LOCKBOX_PASSWORD"),
        };
        cmd
    }

    fn run(&self, password: Option<&str>, args: &[&str]) -> Output {
        self.command(password)
            .args(args)
            .output()
            .expect("run lockbox")
    }

    fn init(&self) {
        let output = self.run(None, &["init"]);
        assert!(output.status.success(), "init failed: {}", stderr(&output));
    }

    fn save_text(&self, text: &str, tag: &str, password: &str) -> String {
        let output = self.run(
            Some(password),
            &["--quiet", "save", "--text", text, "--tag", tag, "--no-input"],
        );
        assert!(output.status.success(), "save failed: {}", stderr(&output));
        stdout(&output).trim().to_string()
    }
}

impl Drop for Sandbox {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.base);
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn exit_code(output: &Output) -> i32 {
    output.status.code().expect("exit code")
}

fn stored_payloads(path: &Path) -> Vec<(String, String, Option<String>)> {
    let conn = Connection::open(path).expect("open store");
    let mut stmt = conn
        .prepare("SELECT payload, type, userTag FROM secretMessages")
        .expect("prepare");
    stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
        .expect("query")
        .collect::<Result<Vec<_>, _>>()
        .expect("rows")
}

#[test]
fn test_save_list_unlock_text() {
    let sandbox = Sandbox::new("text");
    sandbox.init();

    let id = sandbox.save_text("hello", "Bob", PASSWORD);
    assert!(!id.is_empty());

    let list = sandbox.run(None, &["list"]);
    assert!(list.status.success(), "list failed: {}", stderr(&list));
    let listed = stdout(&list);
    assert!(listed.contains(&id));
    assert!(listed.contains(" text bob "));

    let unlock = sandbox.run(Some(PASSWORD), &["unlock", &id, "--no-input"]);
    assert!(unlock.status.success(), "unlock failed: {}", stderr(&unlock));
    assert_eq!(stdout(&unlock).trim_end(), "hello");
}

#[test]
fn test_unlock_with_wrong_password_is_denied() {
    let sandbox = Sandbox::new("denied");
    sandbox.init();
    let id = sandbox.save_text("hello", "bob", PASSWORD);

    let unlock = sandbox.run(Some("wrong!!"), &["unlock", &id, "--no-input"]);
    assert_eq!(exit_code(&unlock), 5);
    assert!(stderr(&unlock).contains("Access Denied: Invalid Security Password."));
    assert!(stdout(&unlock).is_empty());
}

#[test]
fn test_unlock_accepts_unique_prefix() {
    let sandbox = Sandbox::new("prefix");
    sandbox.init();
    let id = sandbox.save_text("hello", "bob", PASSWORD);

    let unlock = sandbox.run(Some(PASSWORD), &["unlock", &id[..20], "--no-input"]);
    assert!(unlock.status.success(), "unlock failed: {}", stderr(&unlock));
    assert_eq!(stdout(&unlock).trim_end(), "hello");
}

#[test]
fn test_unlock_without_password_source_fails() {
    let sandbox = Sandbox::new("nopass");
    sandbox.init();
    let id = sandbox.save_text("hello", "bob", PASSWORD);

    let unlock = sandbox.run(None, &["unlock", &id, "--no-input"]);
    assert_eq!(exit_code(&unlock), 4);
    assert!(stderr(&unlock).contains("LOCKBOX_PASSWORD"));
}

#[test]
fn test_unlock_unknown_record_not_found() {
    let sandbox = Sandbox::new("unknown");
    sandbox.init();

    let unlock = sandbox.run(Some(PASSWORD), &["unlock", "no-such-id", "--no-input"]);
    assert_eq!(exit_code(&unlock), 3);
}

#[test]
fn test_save_rejects_missing_tag() {
    let sandbox = Sandbox::new("notag");
    sandbox.init();

    let output = sandbox.run(Some(PASSWORD), &["save", "--text", "hello", "--no-input"]);
    assert_eq!(exit_code(&output), 4);
    assert!(stored_payloads(&sandbox.store_path()).is_empty());
}

#[test]
fn test_save_allows_missing_tag_when_optional() {
    let sandbox = Sandbox::new("opttag");
    let init = sandbox.run(None, &["init", "--optional-tags"]);
    assert!(init.status.success(), "init failed: {}", stderr(&init));

    let output = sandbox.run(Some(PASSWORD), &["save", "--text", "hello", "--no-input"]);
    assert!(output.status.success(), "save failed: {}", stderr(&output));

    let rows = stored_payloads(&sandbox.store_path());
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].2, None);
}

#[test]
fn test_save_rejects_weak_password() {
    let sandbox = Sandbox::new("weak");
    sandbox.init();

    let output = sandbox.run(
        Some("abc"),
        &["save", "--text", "hello", "--tag", "bob", "--no-input"],
    );
    assert_eq!(exit_code(&output), 4);
    assert!(stored_payloads(&sandbox.store_path()).is_empty());
}

#[test]
fn test_save_rejects_missing_password() {
    let sandbox = Sandbox::new("nopw");
    sandbox.init();

    let output = sandbox.run(None, &["save", "--text", "hello", "--tag", "bob", "--no-input"]);
    assert_eq!(exit_code(&output), 4);
    assert!(stderr(&output).contains("Password is required."));
}

#[test]
fn test_commands_require_init() {
    let sandbox = Sandbox::new("noinit");

    let output = sandbox.run(None, &["list"]);
    assert_eq!(exit_code(&output), 3);
    assert!(stderr(&output).contains("lockbox init"));
}

#[test]
fn test_init_refuses_to_overwrite_config() {
    let sandbox = Sandbox::new("reinit");
    sandbox.init();

    let again = sandbox.run(None, &["init"]);
    assert_eq!(exit_code(&again), 4);

    let forced = sandbox.run(None, &["init", "--force"]);
    assert!(forced.status.success(), "init --force failed: {}", stderr(&forced));
}

#[test]
fn test_stored_payload_uses_salted_format() {
    let sandbox = Sandbox::new("salted");
    sandbox.init();
    sandbox.save_text("hello", "bob", PASSWORD);

    let rows = stored_payloads(&sandbox.store_path());
    assert_eq!(rows.len(), 1);
    let (payload, kind, tag) = &rows[0];
    // base64 of "Salted__"
    assert!(payload.starts_with("U2FsdGVkX1"));
    assert!(!payload.contains("hello"));
    assert_eq!(kind, "text");
    assert_eq!(tag.as_deref(), Some("bob"));
}

#[test]
fn test_age_cipher_round_trip() {
    let sandbox = Sandbox::new("age");
    let init = sandbox.run(None, &["init", "--cipher", "age"]);
    assert!(init.status.success(), "init failed: {}", stderr(&init));
    let id = sandbox.save_text("hello age", "bob", PASSWORD);

    let rows = stored_payloads(&sandbox.store_path());
    assert!(rows[0].0.starts_with("-----BEGIN AGE ENCRYPTED FILE-----"));

    let unlock = sandbox.run(Some(PASSWORD), &["unlock", &id, "--no-input"]);
    assert!(unlock.status.success(), "unlock failed: {}", stderr(&unlock));
    assert_eq!(stdout(&unlock).trim_end(), "hello age");
}

#[test]
fn test_file_save_and_unlock_writes_download() {
    let sandbox = Sandbox::new("file");
    sandbox.init();

    let source = sandbox.base.join("notes.txt");
    std::fs::write(&source, b"file body\n").expect("write source");
    let source_arg = source.to_string_lossy().to_string();

    let save = sandbox.run(
        Some(PASSWORD),
        &["--quiet", "save", "--file", &source_arg, "--tag", "bob", "--no-input"],
    );
    assert!(save.status.success(), "save failed: {}", stderr(&save));
    let id = stdout(&save).trim().to_string();

    let rows = stored_payloads(&sandbox.store_path());
    assert_eq!(rows[0].1, "file");

    let out_dir = sandbox.base.join("out");
    let out_arg = out_dir.to_string_lossy().to_string();
    let unlock = sandbox.run(
        Some(PASSWORD),
        &["--quiet", "unlock", &id, "--out", &out_arg, "--no-input"],
    );
    assert!(unlock.status.success(), "unlock failed: {}", stderr(&unlock));

    let written = PathBuf::from(stdout(&unlock).trim());
    let name = written
        .file_name()
        .expect("file name")
        .to_string_lossy()
        .to_string();
    assert!(name.starts_with("Decrypted_Vault_File_"));
    assert!(name.ends_with(".txt"));
    assert_eq!(std::fs::read(&written).expect("read download"), b"file body\n");
}

#[test]
fn test_oversized_file_is_rejected_before_saving() {
    let sandbox = Sandbox::new("big");
    sandbox.init();

    let source = sandbox.base.join("big.bin");
    std::fs::write(&source, vec![0u8; 1024 * 1024 + 1]).expect("write source");
    let source_arg = source.to_string_lossy().to_string();

    let save = sandbox.run(
        Some(PASSWORD),
        &["save", "--file", &source_arg, "--tag", "bob", "--no-input"],
    );
    assert_eq!(exit_code(&save), 4);
    assert!(stderr(&save).contains("File size exceeds 1MB limit"));
    assert!(stored_payloads(&sandbox.store_path()).is_empty());
}

#[test]
fn test_list_filters_by_tag() {
    let sandbox = Sandbox::new("filter");
    sandbox.init();
    let bob = sandbox.save_text("one", "bob", PASSWORD);
    let alice = sandbox.save_text("two", "alice", PASSWORD);

    let list = sandbox.run(None, &["list", "--tag", "BO"]);
    assert!(list.status.success(), "list failed: {}", stderr(&list));
    let listed = stdout(&list);
    assert!(listed.contains(&bob));
    assert!(!listed.contains(&alice));

    let none = sandbox.run(None, &["list", "--tag", "zzz"]);
    assert!(none.status.success());
    assert!(stdout(&none).contains("No records found."));
}

#[test]
fn test_list_json_is_newest_first() {
    let sandbox = Sandbox::new("json");
    sandbox.init();
    let first = sandbox.save_text("one", "bob", PASSWORD);
    let second = sandbox.save_text("two", "bob", PASSWORD);

    let list = sandbox.run(None, &["list", "--json"]);
    assert!(list.status.success(), "list failed: {}", stderr(&list));
    let value: serde_json::Value = serde_json::from_str(&stdout(&list)).expect("valid json");
    let records = value.as_array().expect("array");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["id"], second.as_str());
    assert_eq!(records[1]["id"], first.as_str());
    assert_eq!(records[0]["type"], "text");
    assert_eq!(records[0]["userTag"], "bob");
}
