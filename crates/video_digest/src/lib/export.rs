use digest_datastore::HistoryRecord;

/// File name for a downloaded transcript, safe on every common filesystem.
pub fn transcript_file_name(title: Option<&str>) -> String {
    let sanitized = title
        .unwrap_or_default()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect::<String>();

    let stem = sanitized.trim().trim_matches('_');
    let stem = if stem.is_empty() { "transcript" } else { stem };
    format!("{stem}_transcript.txt")
}

pub fn render_transcript(record: &HistoryRecord) -> String {
    let title = record.title.as_deref().unwrap_or("Untitled video");
    format!(
        "{title}\nSource: {}\n\n{}\n",
        record.video_url, record.transcript
    )
}
