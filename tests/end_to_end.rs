use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use assert_cmd::Command;
use tempfile::{tempdir, TempDir};

/// Command with an empty config file so a user config never leaks in.
fn rewriter(dir: &Path) -> Result<Command> {
    let config = dir.join("empty.toml");
    fs::write(&config, "")?;
    let mut cmd = Command::cargo_bin("csv-path-rewriter")?;
    cmd.arg("--config").arg(config);
    Ok(cmd)
}

fn write_input(dir: &TempDir, content: &str) -> Result<PathBuf> {
    let path = dir.path().join("in.csv");
    fs::write(&path, content)?;
    Ok(path)
}

#[test]
fn rewrites_with_common_prefix() -> Result<()> {
    let dir = tempdir()?;
    let input = write_input(
        &dir,
        "file_name,transcription\n/root/x/y/1.wav,a\n/root/x/y/z/2.wav,b\n",
    )?;
    let output = dir.path().join("out.csv");

    rewriter(dir.path())?
        .arg(&input)
        .arg(&output)
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(&output)?,
        "file_name,relative_path,transcription\r\n1.wav,1.wav,a\r\n2.wav,z/2.wav,b\r\n"
    );
    Ok(())
}

#[test]
fn rewrites_with_explicit_base_dir() -> Result<()> {
    let dir = tempdir()?;
    let input = write_input(
        &dir,
        "transcription,file_name\na,/root/x/y/1.wav\nb,/root/x/y/z/2.wav\n",
    )?;
    let output = dir.path().join("nested").join("out.csv");

    rewriter(dir.path())?
        .arg(&input)
        .arg(&output)
        .arg("--base-dir")
        .arg("/root/x")
        .assert()
        .success();

    let mut reader = csv::Reader::from_path(&output)?;
    assert_eq!(
        reader.headers()?.iter().collect::<Vec<_>>(),
        vec!["file_name", "relative_path", "transcription"]
    );
    let rows: Vec<Vec<String>> = reader
        .records()
        .map(|r| r.map(|rec| rec.iter().map(str::to_string).collect()))
        .collect::<std::result::Result<_, _>>()?;
    assert_eq!(
        rows,
        vec![
            vec!["1.wav", "y/1.wav", "a"],
            vec!["2.wav", "y/z/2.wav", "b"],
        ]
    );
    Ok(())
}

#[test]
fn base_dir_from_config_file() -> Result<()> {
    let dir = tempdir()?;
    let input = write_input(&dir, "file_name,transcription\n/data/a/b/clip.wav,hi\n")?;
    let output = dir.path().join("out.csv");
    let config = dir.path().join("rewriter.toml");
    fs::write(&config, "[paths]\nbase_dir = \"/data\"\n")?;

    Command::cargo_bin("csv-path-rewriter")?
        .arg("--config")
        .arg(&config)
        .arg(&input)
        .arg(&output)
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(&output)?,
        "file_name,relative_path,transcription\r\nclip.wav,a/b/clip.wav,hi\r\n"
    );
    Ok(())
}

#[test]
fn missing_transcription_column_fails_without_output() -> Result<()> {
    let dir = tempdir()?;
    let input = write_input(&dir, "file_name,text\n/a/1.wav,one\n")?;
    let output = dir.path().join("out.csv");

    let assert = rewriter(dir.path())?
        .arg(&input)
        .arg(&output)
        .assert()
        .failure();

    let stderr = String::from_utf8_lossy(&assert.get_output().stderr);
    assert!(stderr.contains("CSV must contain columns"), "stderr: {stderr}");
    assert!(!output.exists());
    Ok(())
}

#[test]
fn missing_input_fails() -> Result<()> {
    let dir = tempdir()?;
    let output = dir.path().join("out.csv");

    let assert = rewriter(dir.path())?
        .arg(dir.path().join("nope.csv"))
        .arg(&output)
        .assert()
        .failure();

    let stderr = String::from_utf8_lossy(&assert.get_output().stderr);
    assert!(stderr.contains("Input CSV not found"), "stderr: {stderr}");
    assert!(!output.exists());
    Ok(())
}

#[test]
fn directory_input_fails_as_not_found() -> Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("manifests");
    fs::create_dir(&input)?;
    let output = dir.path().join("out.csv");

    let assert = rewriter(dir.path())?
        .arg(&input)
        .arg(&output)
        .assert()
        .failure();

    let stderr = String::from_utf8_lossy(&assert.get_output().stderr);
    assert!(stderr.contains("Input CSV not found"), "stderr: {stderr}");
    assert!(stderr.contains("manifests"), "stderr: {stderr}");
    assert!(!output.exists());
    Ok(())
}

#[test]
fn strict_mode_rejects_unrelated_paths() -> Result<()> {
    let dir = tempdir()?;
    let input = write_input(
        &dir,
        "file_name,transcription\nC:/audio/1.wav,a\nD:/audio/2.wav,b\n",
    )?;
    let output = dir.path().join("out.csv");

    rewriter(dir.path())?
        .arg(&input)
        .arg(&output)
        .arg("--strict")
        .assert()
        .failure();
    assert!(!output.exists());

    rewriter(dir.path())?
        .arg(&input)
        .arg(&output)
        .assert()
        .success();
    assert_eq!(
        fs::read_to_string(&output)?,
        "file_name,relative_path,transcription\r\n1.wav,audio/1.wav,a\r\n2.wav,audio/2.wav,b\r\n"
    );
    Ok(())
}

#[test]
fn print_config_outputs_default_toml() -> Result<()> {
    let assert = Command::cargo_bin("csv-path-rewriter")?
        .arg("--print-config")
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(stdout.contains("[paths]"));
    assert!(stdout.contains("create_parent_dirs = true"));
    Ok(())
}
