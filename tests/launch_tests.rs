use boltzgen_launch::commands::{execute_launch, LaunchArgs};
use boltzgen_launch::launch::{preset_log_path, preset_plan, BoltzgenTool, LaunchPlan};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

#[test]
fn test_preset_command_line() {
    let plan = preset_plan();

    assert_eq!(
        plan.command_line(),
        "boltzgen run example/gpr75/gpr75.yaml --output workbench/gpr75_run2 \
         --protocol peptide-anything --num_designs 10000 --budget 20"
    );
    assert_eq!(
        plan.env,
        vec![("CUDA_VISIBLE_DEVICES".to_string(), "6".to_string())]
    );
    assert_eq!(preset_log_path(), PathBuf::from("nohup_logs/gpr75_run2.log"));
    assert!(plan.current_dir.is_none());
}

#[test]
fn test_default_launch_args_match_preset() {
    let args = LaunchArgs::default();
    assert_eq!(args.plan(), preset_plan());
    assert_eq!(args.log_path, preset_log_path());
    assert!(!args.write_record);
    assert!(!args.dry_run);
}

#[test]
fn test_plan_env_is_child_only() {
    let plan = LaunchPlan::new("x").env("BOLTZGEN_LAUNCH_TEST_ONLY", "1");
    assert_eq!(plan.env.len(), 1);
    assert!(std::env::var("BOLTZGEN_LAUNCH_TEST_ONLY").is_err());
}

#[cfg(unix)]
mod detached {
    use super::{execute_launch, BoltzgenTool, LaunchArgs, LaunchPlan};
    use boltzgen_launch::launch::launch_detached;
    use boltzgen_launch::output::{read_record, record_path_for};
    use std::fs;
    use std::path::Path;
    use std::thread;
    use std::time::{Duration, Instant};

    fn wait_for_log(path: &Path, needle: &str) -> String {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let content = fs::read_to_string(path).unwrap_or_default();
            if content.contains(needle) || Instant::now() > deadline {
                return content;
            }
            thread::sleep(Duration::from_millis(20));
        }
    }

    fn kill(pid: u32) {
        unsafe {
            libc::kill(pid as libc::pid_t, libc::SIGKILL);
        }
    }

    #[test]
    fn test_child_is_session_leader() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log = temp_dir.path().join("sleep.log");

        let launched = launch_detached(&LaunchPlan::new("sleep").arg("5"), &log).unwrap();
        let pid = launched.pid as libc::pid_t;

        let sid = unsafe { libc::getsid(pid) };
        kill(launched.pid);

        assert_eq!(sid, pid);
        assert_ne!(sid, unsafe { libc::getsid(0) });
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_child_survives_sighup() {
        fn state(pid: u32) -> Option<char> {
            let stat = fs::read_to_string(format!("/proc/{}/stat", pid)).ok()?;
            let rest = &stat[stat.rfind(')')? + 1..];
            rest.trim_start().chars().next()
        }

        let temp_dir = tempfile::tempdir().unwrap();
        let log = temp_dir.path().join("hup.log");

        let launched = launch_detached(&LaunchPlan::new("sleep").arg("5"), &log).unwrap();
        unsafe {
            libc::kill(launched.pid as libc::pid_t, libc::SIGHUP);
        }
        thread::sleep(Duration::from_millis(200));

        let after = state(launched.pid);
        kill(launched.pid);

        assert!(matches!(after, Some('S') | Some('R')), "state was {:?}", after);
    }

    #[test]
    fn test_env_and_both_streams_reach_log() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log = temp_dir.path().join("run.log");

        let plan = LaunchPlan::new("sh")
            .args(["-c", "echo device=$CUDA_VISIBLE_DEVICES; echo oops >&2"])
            .env("CUDA_VISIBLE_DEVICES", "6");
        let launched = launch_detached(&plan, &log).unwrap();
        assert_eq!(launched.log_path, log);

        let content = wait_for_log(&log, "oops");
        assert!(content.contains("device=6"), "log was {:?}", content);
        assert!(content.contains("oops"), "log was {:?}", content);
    }

    #[test]
    fn test_log_is_appended() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log = temp_dir.path().join("run.log");
        fs::write(&log, "previous run\n").unwrap();

        let plan = LaunchPlan::new("sh").args(["-c", "echo next run"]);
        launch_detached(&plan, &log).unwrap();

        let content = wait_for_log(&log, "next run");
        assert!(content.starts_with("previous run\n"), "log was {:?}", content);
        assert!(content.contains("next run"));
    }

    #[test]
    fn test_stdin_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log = temp_dir.path().join("stdin.log");

        let plan = LaunchPlan::new("sh").args(["-c", "cat; echo stdin-closed"]);
        launch_detached(&plan, &log).unwrap();

        let content = wait_for_log(&log, "stdin-closed");
        assert_eq!(content.trim(), "stdin-closed");
    }

    #[test]
    fn test_execute_launch_writes_record() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log = temp_dir.path().join("gpr75_run2.log");

        let mut args = LaunchArgs {
            log_path: log.clone(),
            write_record: true,
            ..Default::default()
        };
        // `sh -c SCRIPT sh run ...` receives the tool arguments as $1..
        args.invocation.tool =
            BoltzgenTool::new("sh").with_leading_args(["-c", "echo launched $1 $3", "sh"]);

        let launched = execute_launch(args).unwrap().unwrap();

        let content = wait_for_log(&log, "launched");
        assert!(content.contains("launched run --output"), "log was {:?}", content);

        let record = read_record(record_path_for(&log)).unwrap();
        assert_eq!(record.pid, launched.pid);
        assert_eq!(record.program, "sh");
        assert_eq!(record.env.get("CUDA_VISIBLE_DEVICES").map(String::as_str), Some("6"));
        assert!(record.command_line.contains("--num_designs 10000 --budget 20"));
    }

    #[test]
    fn test_preset_defaults_touch_only_the_log() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log = temp_dir.path().join("gpr75_run2.log");

        let mut args = LaunchArgs {
            log_path: log.clone(),
            ..Default::default()
        };
        args.invocation.tool =
            BoltzgenTool::new("sh").with_leading_args(["-c", "echo only-log", "sh"]);

        execute_launch(args).unwrap().unwrap();
        wait_for_log(&log, "only-log");

        let entries: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![log.file_name().unwrap().to_os_string()]);
        assert!(!record_path_for(&log).exists());
    }

    #[test]
    fn test_missing_log_directory_is_not_created() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log = temp_dir.path().join("nohup_logs/run.log");

        let args = LaunchArgs {
            log_path: log.clone(),
            ..Default::default()
        };
        assert!(execute_launch(args).is_err());
        assert!(!temp_dir.path().join("nohup_logs").exists());
    }
}
