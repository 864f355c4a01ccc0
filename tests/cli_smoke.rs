use std::path::PathBuf;
use std::process::Command;

fn exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_videobook")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "videobook.exe"
            } else {
                "videobook"
            });
            p
        })
}

fn data(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
        .to_string_lossy()
        .to_string()
}

#[test]
fn cli_parse_prints_entries() {
    let out = Command::new(exe())
        .args(["parse", "--in", data("spoken.srt").as_str()])
        .output()
        .unwrap();
    assert!(out.status.success());

    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let entries = v.as_array().unwrap();
    assert_eq!(entries.len(), 4);
    assert_eq!(entries[0]["text"], "Once upon a time");
    assert_eq!(entries[3]["end"], 18.0);
}

#[test]
fn cli_frame_prints_state() {
    let out = Command::new(exe())
        .args(["frame", "--props", data("props.json").as_str(), "--frame", "150"])
        .output()
        .unwrap();
    assert!(out.status.success());

    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["current_index"], 1);
    assert_eq!(v["highlights"][1], "active");
    assert_eq!(v["illustration"]["asset"], "img/village.png");
}

#[test]
fn cli_timeline_prints_json_lines() {
    let out = Command::new(exe())
        .args([
            "timeline",
            "--props",
            data("props.json").as_str(),
            "--from",
            "0",
            "--to",
            "300",
            "--step",
            "30",
        ])
        .output()
        .unwrap();
    assert!(out.status.success());

    let text = String::from_utf8(out.stdout).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 10);
    let last: serde_json::Value = serde_json::from_str(lines[9]).unwrap();
    assert_eq!(last["frame"], 270);
}

#[test]
fn cli_rejects_frame_past_duration() {
    let status = Command::new(exe())
        .args([
            "frame",
            "--props",
            data("props.json").as_str(),
            "--frame",
            "100",
            "--duration",
            "50",
        ])
        .status()
        .unwrap();
    assert!(!status.success());
}
