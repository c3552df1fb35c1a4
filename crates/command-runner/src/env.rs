//! Environment-file injected execution
//!
//! Service commands run with the service's `.env` loaded and a small set
//! of override variables exported on top. An absent command means "open an
//! interactive shell in that environment instead".

use crate::Command;
use crate::command::shell_quote;
use std::path::Path;

/// Build a command that runs `command` inside `path` with `env_file`
/// sourced and `overrides` exported over it
///
/// When `command` is `None` the returned command drops into an interactive
/// bash session with the same environment. `app_name` is exposed to the
/// child as `DEVSTACK_APP`.
pub fn exec_with_env(
    command: Option<&str>,
    path: &Path,
    env_file: &Path,
    overrides: &[(String, String)],
    app_name: &str,
) -> Command {
    let env_file = shell_quote(&env_file.to_string_lossy());

    let mut script = String::new();
    script.push_str("set -a; ");
    script.push_str(&format!("[ -f {env_file} ] && . {env_file}; "));
    script.push_str("set +a; ");
    for (key, value) in overrides {
        script.push_str(&format!("export {}={}; ", key, shell_quote(value)));
    }
    match command {
        Some(cmd) => script.push_str(&format!("exec {cmd}")),
        None => script.push_str("exec bash -i"),
    }

    let mut cmd = Command::new("/bin/bash");
    cmd.arg("-c")
        .arg(script)
        .current_dir(path)
        .env("DEVSTACK_APP", app_name);
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn script_of(cmd: &Command) -> String {
        cmd.get_args()[1].clone()
    }

    #[test]
    fn test_sources_env_file_and_execs_command() {
        let cmd = exec_with_env(
            Some("bin/start_web_server.sh"),
            Path::new("/srv/wb-hub"),
            Path::new("/srv/wb-hub/.env"),
            &[],
            "wb-hub",
        );

        let script = script_of(&cmd);
        assert!(script.contains(". /srv/wb-hub/.env"));
        assert!(script.ends_with("exec bin/start_web_server.sh"));
        assert_eq!(cmd.get_current_dir(), Some(Path::new("/srv/wb-hub")));
        assert_eq!(
            cmd.get_envs(),
            [("DEVSTACK_APP".to_string(), "wb-hub".to_string())]
        );
    }

    #[test]
    fn test_overrides_exported_after_sourcing() {
        let overrides = vec![("RAILS_ENV".to_string(), "development".to_string())];
        let cmd = exec_with_env(
            Some("rails console"),
            Path::new("/srv/app"),
            Path::new("/srv/app/.env"),
            &overrides,
            "app",
        );

        let script = script_of(&cmd);
        let source_at = script.find(".env").unwrap();
        let export_at = script.find("export RAILS_ENV=development").unwrap();
        assert!(export_at > source_at);
    }

    #[test]
    fn test_no_command_opens_interactive_shell() {
        let cmd = exec_with_env(
            None,
            &PathBuf::from("/srv/app"),
            &PathBuf::from("/srv/app/.env"),
            &[],
            "app",
        );
        assert!(script_of(&cmd).ends_with("exec bash -i"));
    }

    #[test]
    fn test_runs_in_sourced_environment() {
        let dir = tempfile::tempdir().unwrap();
        let env_file = dir.path().join(".env");
        std::fs::write(&env_file, "GREETING=hello\n").unwrap();

        let cmd = exec_with_env(
            Some("echo \"$GREETING $DEVSTACK_APP\""),
            dir.path(),
            &env_file,
            &[],
            "wb-hub",
        );
        assert_eq!(cmd.capture().unwrap(), "hello wb-hub\n");
    }
}
