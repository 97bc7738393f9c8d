//! # Subtitle Parser
//!
//! Turns WebVTT caption files written by yt-dlp into the plain transcript text
//! handed to the summarizer.

use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;

// inline markup: <c>, </c>, <00:00:01.234>, <v Speaker>
static VTT_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Converts a WebVTT document into space-joined cue text.
///
/// The header block, NOTE/STYLE/REGION blocks, cue identifiers and timing
/// lines are dropped. Auto-generated captions repeat each line in the
/// following cue, so consecutive duplicates are collapsed.
pub fn vtt_to_text(vtt: &str) -> String {
    let lines = vtt.lines().map(str::trim).collect::<Vec<_>>();
    let mut text = Vec::new();

    for (index, block) in lines.split(|line| line.is_empty()).enumerate() {
        let Some(first) = block.first() else {
            continue;
        };
        if (index == 0 && first.starts_with("WEBVTT")) || is_metadata_block(first) {
            continue;
        }

        for (i, line) in block.iter().enumerate() {
            if is_timing_line(line) {
                continue;
            }
            // cue identifier
            if block.get(i + 1).is_some_and(|next| is_timing_line(next)) {
                continue;
            }

            let cleaned = decode_entities(&VTT_TAG_RE.replace_all(line, ""));
            let cleaned = cleaned.split_whitespace().join(" ");
            if !cleaned.is_empty() {
                text.push(cleaned);
            }
        }
    }

    text.into_iter().dedup().join(" ")
}

fn is_timing_line(line: &str) -> bool {
    line.contains("-->")
}

fn is_metadata_block(first: &str) -> bool {
    ["NOTE", "STYLE", "REGION"].iter().any(|keyword| {
        first
            .strip_prefix(keyword)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
    })
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_cues_are_joined() {
        let vtt = "WEBVTT\n\
                   Kind: captions\n\
                   Language: en\n\
                   \n\
                   1\n\
                   00:00:00.000 --> 00:00:02.000\n\
                   Hello world,\n\
                   \n\
                   2\n\
                   00:00:02.000 --> 00:00:04.000\n\
                   this is a test.\n";

        assert_eq!(vtt_to_text(vtt), "Hello world, this is a test.");
    }

    #[test]
    fn test_auto_caption_markup_and_repeats_are_removed() {
        let vtt = r#"WEBVTT
Kind: captions
Language: en

00:00:00.030 --> 00:00:02.110 align:start position:0%

cats<00:00:00.480><c> are</c><00:00:00.840><c> great</c>

00:00:02.110 --> 00:00:02.120 align:start position:0%
cats are great


00:00:02.120 --> 00:00:04.000 align:start position:0%
cats are great
and dogs &amp; birds too
"#;

        assert_eq!(vtt_to_text(vtt), "cats are great and dogs & birds too");
    }

    #[test]
    fn test_note_and_style_blocks_are_skipped() {
        let vtt = "WEBVTT\n\nNOTE this is a comment\nspanning lines\n\nSTYLE\n::cue { color: red }\n\n00:00.000 --> 00:01.000\n<v Alice>Only this</v>\n";

        assert_eq!(vtt_to_text(vtt), "Only this");
    }

    #[test]
    fn test_spoken_text_resembling_markup_is_kept() {
        let vtt = "WEBVTT\n\
                   Kind: captions\n\
                   Language: en\n\
                   \n\
                   00:00:00.000 --> 00:00:02.000\n\
                   How many cats did we count?\n\
                   \n\
                   00:00:02.000 --> 00:00:03.000\n\
                   42\n\
                   \n\
                   00:00:03.000 --> 00:00:05.000\n\
                   NOTEBOOKS help with this.\n\
                   And so do pens.\n\
                   \n\
                   00:00:05.000 --> 00:00:07.000\n\
                   Language: it matters.\n";

        assert_eq!(
            vtt_to_text(vtt),
            "How many cats did we count? 42 NOTEBOOKS help with this. And so do pens. Language: it matters."
        );
    }

    #[test]
    fn test_numeric_cue_ids_are_dropped_but_numeric_text_is_not() {
        let vtt = "WEBVTT\n\
                   \n\
                   2024\n\
                   00:00:00.000 --> 00:00:02.000\n\
                   The year was\n\
                   2024\n";

        assert_eq!(vtt_to_text(vtt), "The year was 2024");
    }

    #[test]
    fn test_empty_document_yields_empty_text() {
        assert_eq!(vtt_to_text("WEBVTT\n\n"), "");
        assert_eq!(vtt_to_text(""), "");
    }
}
