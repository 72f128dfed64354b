//! The `netrack init` command.

use std::path::Path;

use anyhow::Result;

use netrack_store::config::LOCAL_CONFIG_FILE;

pub fn execute() -> Result<()> {
    if Path::new(LOCAL_CONFIG_FILE).exists() {
        println!("{LOCAL_CONFIG_FILE} already exists, skipping.");
    } else {
        std::fs::write(LOCAL_CONFIG_FILE, SAMPLE_CONFIG)?;
        println!("Created {LOCAL_CONFIG_FILE}");
    }

    std::fs::create_dir_all("sample-data")?;
    let sample_path = Path::new("sample-data/exams.toml");
    if sample_path.exists() {
        println!("sample-data/exams.toml already exists, skipping.");
    } else {
        std::fs::write(sample_path, SAMPLE_RECORDS)?;
        println!("Created sample-data/exams.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit {LOCAL_CONFIG_FILE} (user_id, store)");
    println!("  2. Run: netrack validate --path sample-data/exams.toml");
    println!("  3. Run: netrack import --path sample-data/exams.toml");
    println!("  4. Run: netrack stats --type TYT");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# netrack configuration

user_id = "local"
default_exam_type = "TYT"
output_dir = "./netrack-reports"

[store]
type = "file"
path = "netrack-exams.json"

# Supabase / PostgREST instead of a local file:
# [store]
# type = "rest"
# url = "https://your-project.supabase.co"
# api_key = "${NETRACK_API_KEY}"
# table = "exams"
"#;

const SAMPLE_RECORDS: &str = r#"# Practice exams. Counts per subject: _dogru (correct), _yanlis (wrong), _bos (blank).

[[exams]]
id = "sample-tyt-1"
exam_type = "TYT"
exam_date = "2024-01-14"
tyt_turkce_dogru = 30
tyt_turkce_yanlis = 6
tyt_turkce_bos = 4
tyt_matematik_dogru = 22
tyt_matematik_yanlis = 8
tyt_matematik_bos = 10
tyt_fen_dogru = 10
tyt_fen_yanlis = 4
tyt_fen_bos = 6
tyt_sosyal_dogru = 14
tyt_sosyal_yanlis = 4
tyt_sosyal_bos = 2

[[exams]]
id = "sample-tyt-2"
exam_type = "TYT"
exam_date = "2024-02-11"
tyt_turkce_dogru = 33
tyt_turkce_yanlis = 4
tyt_turkce_bos = 3
tyt_matematik_dogru = 26
tyt_matematik_yanlis = 6
tyt_matematik_bos = 8
tyt_fen_dogru = 12
tyt_fen_yanlis = 4
tyt_fen_bos = 4
tyt_sosyal_dogru = 15
tyt_sosyal_yanlis = 3
tyt_sosyal_bos = 2

[[exams]]
id = "sample-ayt-1"
exam_type = "AYT_SAYISAL"
exam_date = "2024-02-18"
ayt_matematik_dogru = 24
ayt_matematik_yanlis = 8
ayt_matematik_bos = 8
ayt_fizik_dogru = 7
ayt_fizik_yanlis = 3
ayt_fizik_bos = 4
ayt_kimya_dogru = 8
ayt_kimya_yanlis = 2
ayt_kimya_bos = 3
ayt_biyoloji_dogru = 9
ayt_biyoloji_yanlis = 2
ayt_biyoloji_bos = 2
"#;
