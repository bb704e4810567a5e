use lyricsync::constants::SHEET_EXTENSIONS;
use lyricsync::error::LyricsError;
use lyricsync::format::format_timestamp;
use lyricsync::lyrics::LyricSheet;
use owo_colors::OwoColorize;
use std::error::Error;
use std::fs;
use std::path::Path;
use std::time::Duration;

fn load(path: Option<&str>) -> Result<LyricSheet, LyricsError> {
    LyricSheet::load_or_builtin(path.map(Path::new))
}

pub fn handle_check(path: Option<&str>) -> Result<(), Box<dyn Error>> {
    let label = path.unwrap_or("bundled sheet");
    println!("Checking lyric sheet: {label}");
    println!();

    if let Some(ext) = path
        .and_then(|p| Path::new(p).extension())
        .and_then(|e| e.to_str())
        && !SHEET_EXTENSIONS.contains(&ext.to_lowercase().as_str())
    {
        println!(
            "{} unrecognised extension '.{ext}', reading as TOML",
            "Warning:".yellow()
        );
    }

    match load(path) {
        Ok(sheet) => {
            println!("Summary:");
            println!("  Lines: {}", sheet.len());
            println!("  Timestamps: {}", sheet.timestamps().len());
            let unreachable = unreachable_lines(&sheet);
            if !unreachable.is_empty() {
                println!(
                    "  {} lines never selected by a timestamp: {:?}",
                    unreachable.len(),
                    unreachable
                );
            }
            if sheet.timestamps().start().is_none() {
                println!(
                    "  {} no 00:00 entry, restarts will not re-sync",
                    "!".yellow()
                );
            }
            println!("\n{}", "✓ Lyric sheet is consistent".green());
            Ok(())
        }
        Err(e) => {
            println!("{} {e}", "✗".red());
            Err(e.into())
        }
    }
}

/// Lines no timestamp points at.
pub fn unreachable_lines(sheet: &LyricSheet) -> Vec<usize> {
    let mut hit = vec![false; sheet.len()];
    for (_, index) in sheet.timestamps().iter() {
        hit[index] = true;
    }
    hit.iter()
        .enumerate()
        .filter(|(_, hit)| !**hit)
        .map(|(i, _)| i)
        .collect()
}

pub fn handle_show(path: Option<&str>) -> Result<(), Box<dyn Error>> {
    let sheet = load(path)?;
    println!("{} {}", sheet.title().bold(), format!("· {}", sheet.artist()).dimmed());
    println!();

    let mut starts = vec![None; sheet.len()];
    for (seconds, index) in sheet.timestamps().iter() {
        starts[index].get_or_insert(seconds);
    }

    for line in sheet.lines() {
        let at = starts[line.index]
            .map(|s| format_timestamp(Duration::from_secs(s)))
            .unwrap_or_else(|| "  -  ".to_string());
        let text = if line.text.is_empty() {
            "…".dimmed().to_string()
        } else {
            line.text.clone()
        };
        println!(
            "{} {:>3}  {:>4.1}s  x{}  {}",
            at.cyan(),
            line.index,
            line.animation_duration.as_secs_f64(),
            line.line_count,
            text
        );
    }
    Ok(())
}

pub fn handle_export(json: bool, output: Option<&str>) -> Result<(), Box<dyn Error>> {
    let sheet = LyricSheet::builtin()?;
    let contents = if json {
        sheet.to_json_string()?
    } else {
        sheet.to_toml_string()?
    };

    match output {
        Some(path) => {
            fs::write(path, contents)?;
            println!("Lyric sheet written to {path}");
        }
        None => print!("{contents}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_sheet_unreachable_lines() {
        let sheet = LyricSheet::builtin().unwrap();
        assert_eq!(unreachable_lines(&sheet), vec![43]);
    }

    #[test]
    fn test_export_then_check() {
        let dir = TempDir::new().unwrap();
        for (json, name) in [(false, "sheet.toml"), (true, "sheet.json")] {
            let path = dir.path().join(name);
            let path = path.to_str().unwrap();
            handle_export(json, Some(path)).unwrap();
            handle_check(Some(path)).unwrap();
        }
    }

    #[test]
    fn test_check_rejects_inconsistent_sheet() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(
            &path,
            r#"
[[lines]]
text = "only"

[timestamps]
"00:00" = 0
"00:04" = 3
"#,
        )
        .unwrap();
        assert!(handle_check(Some(path.to_str().unwrap())).is_err());
    }

    #[test]
    fn test_check_missing_sheet() {
        assert!(handle_check(Some("/nonexistent/sheet.toml")).is_err());
    }
}
