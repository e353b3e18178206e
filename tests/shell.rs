#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use myshell::{Env, MemoryEnv, Output, Shell};
use tempfile::TempDir;

/// A shell whose PATH holds only a scratch `bin` directory plus `/bin` and
/// `/usr/bin`, with a scratch working directory.
struct Fixture {
    _root: TempDir,
    bin: PathBuf,
    work: PathBuf,
    shell: Shell<MemoryEnv>,
}

impl Fixture {
    fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let base = root.path().canonicalize().unwrap();
        let bin = base.join("bin");
        let work = base.join("work");
        fs::create_dir(&bin).unwrap();
        fs::create_dir(&work).unwrap();

        let env = MemoryEnv::new(&work)
            .with_var("PATH", format!("{}:/bin:/usr/bin", bin.display()))
            .with_var("HOME", base.to_str().unwrap());
        Self {
            _root: root,
            bin,
            work,
            shell: Shell::new(env),
        }
    }

    fn script(&self, name: &str, body: &str) -> PathBuf {
        let path = self.bin.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn read(&self, name: &str) -> String {
        fs::read_to_string(self.work.join(name)).unwrap()
    }
}

fn stdout(text: &str) -> Option<Output> {
    Some(Output::Stdout(text.to_string()))
}

fn stderr(text: &str) -> Option<Output> {
    Some(Output::Stderr(text.to_string()))
}

#[test]
fn echo_joins_words() {
    let mut fx = Fixture::new();
    let report = fx.shell.execute("echo foo   bar");
    assert_eq!(report.output, stdout("foo bar"));
    assert_eq!(report.status, 0);
}

#[test]
fn quoted_arguments_reach_builtins_decoded() {
    let mut fx = Fixture::new();
    let report = fx.shell.execute(r#"echo 'hello    world' "a\qb" x\ y"#);
    assert_eq!(report.output, stdout(r"hello    world a\qb x y"));
}

#[test]
fn unknown_command() {
    let mut fx = Fixture::new();
    let report = fx.shell.execute("nosuchcmd123 --flag");
    assert_eq!(report.output, stderr("nosuchcmd123: command not found"));
    assert_eq!(report.status, 1);
}

#[test]
fn external_command_output_is_captured() {
    let mut fx = Fixture::new();
    fx.script("greet", r#"echo "hi $1""#);
    let report = fx.shell.execute("greet there");
    assert_eq!(report.output, stdout("hi there"));
    assert_eq!(report.status, 0);
}

#[test]
fn failing_external_command_reports_stderr() {
    let mut fx = Fixture::new();
    fx.script("broken", "echo partial\necho boom >&2\nexit 7");
    let report = fx.shell.execute("broken");
    assert_eq!(report.output, stderr("boom"));
    assert_eq!(report.status, 1);
}

#[test]
fn external_commands_run_in_shell_directory() {
    let mut fx = Fixture::new();
    fx.script("where", "pwd");
    let report = fx.shell.execute("where");
    assert_eq!(report.output, stdout(fx.work.to_str().unwrap()));
}

#[test]
fn redirect_writes_file_and_prints_nothing() {
    let mut fx = Fixture::new();
    let report = fx.shell.execute("echo hi > out.txt");
    assert_eq!(report.output, None);
    assert_eq!(report.status, 0);
    assert_eq!(fx.read("out.txt").trim(), "hi");
}

#[test]
fn redirect_to_absolute_path() {
    let mut fx = Fixture::new();
    let target = fx.work.join("abs.txt");
    fx.shell.execute(&format!("echo hi > {}", target.display()));
    assert_eq!(fs::read_to_string(target).unwrap(), "hi\n");
}

#[test]
fn redirect_truncates_then_appends() {
    let mut fx = Fixture::new();
    fx.shell.execute("echo one > log.txt");
    fx.shell.execute("echo two > log.txt");
    assert_eq!(fx.read("log.txt"), "two\n");

    fx.shell.execute("echo three >> log.txt");
    fx.shell.execute("echo four 1>> log.txt");
    assert_eq!(fx.read("log.txt"), "two\nthree\nfour\n");
}

#[test]
fn redirect_appends_literal_words_after_previous_output() {
    let mut fx = Fixture::new();
    fx.shell.execute("echo hi > out.txt tail words");
    assert_eq!(fx.read("out.txt"), "hi tail words\n");
}

#[test]
fn redirect_external_stdout() {
    let mut fx = Fixture::new();
    fx.script("lines", "echo a\necho b");
    let report = fx.shell.execute("lines 1> out.txt");
    assert_eq!(report.output, None);
    assert_eq!(fx.read("out.txt"), "a\nb\n");
}

#[test]
fn redirect_stderr_keeps_stdout_visible() {
    let mut fx = Fixture::new();
    fx.script("noisy", "echo visible\necho hidden >&2");
    let report = fx.shell.execute("noisy 2> err.txt");
    assert_eq!(report.output, stdout("visible"));
    assert_eq!(fx.read("err.txt"), "hidden\n");
}

#[test]
fn chained_redirects_only_the_first_gets_output() {
    let mut fx = Fixture::new();
    fx.shell.execute("echo hi > a.txt > b.txt");
    assert_eq!(fx.read("a.txt"), "hi\n");
    assert_eq!(fx.read("b.txt"), "");
}

#[test]
fn redirect_without_target_is_a_syntax_error() {
    let mut fx = Fixture::new();
    let report = fx.shell.execute("echo hi >");
    assert_eq!(
        report.output,
        stderr("syntax error near unexpected token `newline'")
    );
    assert_eq!(report.status, 1);
}

#[test]
fn cd_and_pwd_share_state_across_lines() {
    let mut fx = Fixture::new();
    fs::create_dir(fx.work.join("sub")).unwrap();

    assert_eq!(fx.shell.execute("cd sub").output, None);
    let report = fx.shell.execute("pwd");
    assert_eq!(report.output, stdout(fx.work.join("sub").to_str().unwrap()));

    fx.shell.execute("echo inside > here.txt");
    assert_eq!(fx.read("sub/here.txt"), "inside\n");
}

#[test]
fn cd_to_missing_directory_keeps_working_directory() {
    let mut fx = Fixture::new();
    let report = fx.shell.execute("cd /nonexistent_dir_12345");
    assert_eq!(
        report.output,
        stderr("cd: /nonexistent_dir_12345: No such file or directory")
    );
    assert_eq!(report.status, 1);
    assert_eq!(fx.shell.env().current_dir().unwrap(), fx.work);
}

#[test]
fn cd_tilde_goes_home() {
    let mut fx = Fixture::new();
    fx.shell.execute("cd ~");
    let home = fx.shell.env().home_dir().unwrap();
    assert_eq!(fx.shell.env().current_dir().unwrap(), home);
}

#[test]
fn type_classifies_names() {
    let mut fx = Fixture::new();
    let tool = fx.script("mytool", "true");

    let report = fx.shell.execute("type echo");
    assert_eq!(report.output, stdout("echo is a shell builtin"));

    let report = fx.shell.execute("type mytool");
    assert_eq!(report.output, stdout(&format!("mytool is {}", tool.display())));

    let report = fx.shell.execute("type nosuchcmd123");
    assert_eq!(report.output, stderr("nosuchcmd123: not found"));
    assert_eq!(report.status, 1);
}

#[test]
fn builtins_shadow_path_executables() {
    let mut fx = Fixture::new();
    fx.script("pwd", "echo shadowed");
    let report = fx.shell.execute("type pwd");
    assert_eq!(report.output, stdout("pwd is a shell builtin"));
    let report = fx.shell.execute("pwd");
    assert_eq!(report.output, stdout(fx.work.to_str().unwrap()));
}

#[test]
fn resolution_sees_path_changes_between_lines() {
    let mut fx = Fixture::new();
    assert_eq!(fx.shell.execute("latecomer").status, 1);
    fx.script("latecomer", "echo arrived");
    assert_eq!(fx.shell.execute("latecomer").output, stdout("arrived"));
}

#[test]
fn exit_with_status() {
    let mut fx = Fixture::new();
    let report = fx.shell.execute("exit 3");
    assert_eq!(report.exit, Some(3));

    let report = fx.shell.execute("exit");
    assert_eq!(report.exit, Some(0));
}

#[test]
fn exit_with_too_many_arguments_keeps_running() {
    let mut fx = Fixture::new();
    let report = fx.shell.execute("exit 1 2");
    assert_eq!(report.exit, None);
    assert_eq!(report.output, stderr("too many arguments"));
}

#[test]
fn exit_with_non_numeric_argument() {
    let mut fx = Fixture::new();
    let report = fx.shell.execute("exit abc");
    assert_eq!(report.exit, Some(0));
    assert_eq!(report.output, stderr("exit: abc: numeric argument required"));
}

#[test]
fn run_writes_reports_with_newlines() {
    let mut fx = Fixture::new();
    let mut out = Vec::new();
    let mut err = Vec::new();
    fx.shell.run("echo a", &mut out, &mut err).unwrap();
    fx.shell.run("echo b > b.txt", &mut out, &mut err).unwrap();
    fx.shell.run("nosuchcmd123", &mut out, &mut err).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "a\n");
    assert_eq!(
        String::from_utf8(err).unwrap(),
        "nosuchcmd123: command not found\n"
    );
}

#[test]
fn relative_path_entries_resolve_from_shell_directory() {
    let mut fx = Fixture::new();
    let tool = fx.work.join("tool");
    fs::write(&tool, "#!/bin/sh\necho local\n").unwrap();
    fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();

    let env = MemoryEnv::new(&fx.work).with_var("PATH", ".:/bin:/usr/bin");
    fx.shell = Shell::new(env);
    let report = fx.shell.execute("type tool");
    assert_eq!(report.output, stdout(&format!("tool is {}", tool.display())));
    assert_eq!(fx.shell.execute("tool").output, stdout("local"));
}

#[test]
fn child_sees_only_the_shell_environment() {
    let env_bin = PathBuf::from("/usr/bin/env");
    if !env_bin.exists() {
        return;
    }
    let mut fx = Fixture::new();
    let report = fx.shell.execute("env");
    let Some(Output::Stdout(listing)) = report.output else {
        panic!("expected env output, got {:?}", report.output);
    };
    let home = fx.shell.env().home_dir().unwrap();
    assert!(listing.lines().any(|l| l == format!("HOME={}", home.display())));
    assert!(listing.lines().any(|l| l.starts_with("PATH=") && l.contains("/bin")));

    let mut bare = Shell::new(MemoryEnv::new(&fx.work));
    let report = bare.execute("/usr/bin/env");
    let listing = match report.output {
        Some(Output::Stdout(text)) => text,
        _ => String::new(),
    };
    assert!(!listing.lines().any(|l| l.starts_with("PATH=") || l.starts_with("HOME=")));
}
