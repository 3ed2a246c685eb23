use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use script_align::corpus::{load_recognition, write_mapping};
use script_align::{
    AlignerConfig, AlignmentResult, BatchRunner, CancellationToken, SpanStrategy,
    TranscriptAligner, TranscriptAlignerBuilder,
};
use tempfile::TempDir;

const NEWS_SCRIPT: &str = "\
정부는 오늘 새 정책을 발표했다
\"시민들은 대체로 환영하는 분위기였다\"
전문가들은 신중한 접근을 주문했다
";

struct Corpus {
    dir: TempDir,
}

impl Corpus {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::create_dir_all(dir.path().join("audio")).unwrap();
        fs::create_dir_all(dir.path().join("assets")).unwrap();
        Self { dir }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn clip(&self, name: &str) -> String {
        self.root().join("audio").join(name).to_string_lossy().into_owned()
    }

    fn write_script_cp949(&self, name: &str, text: &str) {
        let (bytes, _, had_errors) = encoding_rs::EUC_KR.encode(text);
        assert!(!had_errors);
        fs::write(self.root().join("assets").join(name), bytes).unwrap();
    }

    fn write_recognition_cp949(&self, entries: &[(String, &str)]) -> PathBuf {
        let map: BTreeMap<&str, &str> = entries.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        let json = serde_json::to_string(&map).unwrap();
        let (bytes, _, had_errors) = encoding_rs::EUC_KR.encode(&json);
        assert!(!had_errors);
        let path = self.root().join("recognition.json");
        fs::write(&path, bytes).unwrap();
        path
    }
}

fn aligner(config: AlignerConfig) -> TranscriptAligner {
    TranscriptAlignerBuilder::new(config).build().expect("aligner")
}

fn news_corpus() -> (Corpus, PathBuf) {
    let corpus = Corpus::new();
    corpus.write_script_cp949("news.txt", NEWS_SCRIPT);
    let recognition = corpus.write_recognition_cp949(&[
        (corpus.clip("news.0001.wav"), "새 정책을 발표했다"),
        (corpus.clip("news.0002.wav"), "시민들은 대체로 환영하는 분위기였다"),
        (corpus.clip("news.0003.wav"), "전문가들은 신중한 접근을"),
        (corpus.clip("sports.0001.wav"), "경기가 시작됐다"),
    ]);
    (corpus, recognition)
}

#[test]
fn cp949_corpus_is_aligned_end_to_end() {
    let (corpus, recognition_path) = news_corpus();
    let recognition = load_recognition(&recognition_path, "cp949").unwrap();
    assert_eq!(recognition.len(), 4);

    let aligner = aligner(AlignerConfig::default());
    let outcome = BatchRunner::new(&aligner).run(&recognition).unwrap();

    assert_eq!(
        outcome.mapping[&corpus.clip("news.0001.wav")],
        AlignmentResult::Aligned("새 정책을 발표했다.".to_string())
    );
    assert_eq!(
        outcome.mapping[&corpus.clip("news.0002.wav")],
        AlignmentResult::Aligned("시민들은 대체로 환영하는 분위기였다.".to_string())
    );
    assert_eq!(
        outcome.mapping[&corpus.clip("news.0003.wav")],
        AlignmentResult::Aligned("전문가들은 신중한 접근을".to_string())
    );
}

#[test]
fn every_clip_appears_in_output_even_without_reference() {
    let (corpus, recognition_path) = news_corpus();
    let recognition = load_recognition(&recognition_path, "cp949").unwrap();
    let aligner = aligner(AlignerConfig::default());
    let outcome = BatchRunner::new(&aligner).run(&recognition).unwrap();

    let keys: Vec<&String> = outcome.mapping.keys().collect();
    let expected: Vec<&String> = recognition.keys().collect();
    assert_eq!(keys, expected);

    let missing = corpus.clip("sports.0001.wav");
    assert_eq!(
        outcome.mapping[&missing],
        AlignmentResult::Unresolved("경기가 시작됐다".to_string())
    );
    assert_eq!(outcome.report.counts.failed, 1);
    assert_eq!(outcome.report.failed_clips, vec![missing]);
    assert_eq!(outcome.report.counts.aligned, 3);
}

#[test]
fn written_mapping_uses_result_shapes() {
    let (corpus, recognition_path) = news_corpus();
    let recognition = load_recognition(&recognition_path, "cp949").unwrap();
    let aligner = aligner(AlignerConfig::default());
    let outcome = BatchRunner::new(&aligner).run(&recognition).unwrap();

    let out = corpus.root().join("alignment.json");
    assert!(write_mapping(&out, &outcome.mapping).unwrap().is_none());

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.ends_with('\n'));
    assert!(text.contains("\n    \""), "four-space indentation expected");
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        value[corpus.clip("news.0001.wav")],
        serde_json::json!("새 정책을 발표했다.")
    );
    assert_eq!(
        value[corpus.clip("sports.0001.wav")],
        serde_json::json!(["경기가 시작됐다"])
    );
}

#[test]
fn repeated_runs_write_identical_bytes_and_keep_a_backup() {
    let (corpus, recognition_path) = news_corpus();
    let recognition = load_recognition(&recognition_path, "cp949").unwrap();
    let out = corpus.root().join("alignment.json");

    let first = aligner(AlignerConfig::default());
    let outcome = BatchRunner::new(&first).run(&recognition).unwrap();
    write_mapping(&out, &outcome.mapping).unwrap();
    let first_bytes = fs::read(&out).unwrap();

    let second = aligner(AlignerConfig {
        threads: Some(3),
        ..AlignerConfig::default()
    });
    let outcome = BatchRunner::new(&second).run(&recognition).unwrap();
    let backup = write_mapping(&out, &outcome.mapping)
        .unwrap()
        .expect("existing output is backed up");

    assert_eq!(fs::read(&out).unwrap(), first_bytes);
    assert_eq!(fs::read(&backup).unwrap(), first_bytes);
    let backup_name = backup.file_name().unwrap().to_string_lossy().into_owned();
    assert!(backup_name.starts_with("alignment.backup_"), "{backup_name}");
    assert!(backup_name.ends_with(".json"), "{backup_name}");
}

#[test]
fn utf8_references_and_windowed_strategy() {
    let corpus = Corpus::new();
    fs::write(
        corpus.root().join("assets").join("story.txt"),
        "The quick brown fox jumps over the lazy dog.\nIt was a bright cold day in April.\n",
    )
    .unwrap();
    let mut recognition = BTreeMap::new();
    recognition.insert(
        corpus.clip("story.0001.wav"),
        "quick brown fox jump over lazy".to_string(),
    );

    let aligner = aligner(AlignerConfig {
        strategy: SpanStrategy::Windowed,
        reference_encoding: "utf-8".to_string(),
        ..AlignerConfig::default()
    });
    let outcome = BatchRunner::new(&aligner).run(&recognition).unwrap();
    assert_eq!(
        outcome.mapping[&corpus.clip("story.0001.wav")],
        AlignmentResult::Aligned("quick brown fox jumps over the lazy".to_string())
    );
}

#[test]
fn cancelled_run_leaves_clips_out() {
    let (_corpus, recognition_path) = news_corpus();
    let recognition = load_recognition(&recognition_path, "cp949").unwrap();
    let aligner = aligner(AlignerConfig::default());
    let token = CancellationToken::new();
    token.cancel();

    let outcome = BatchRunner::new(&aligner)
        .with_cancellation(token)
        .run(&recognition)
        .unwrap();
    assert!(outcome.mapping.is_empty());
    assert_eq!(outcome.report.counts.skipped, 4);
}

#[test]
fn undecodable_reference_fails_only_its_clip() {
    let corpus = Corpus::new();
    corpus.write_script_cp949("news.txt", NEWS_SCRIPT);
    // 0xFF never starts a cp949 character.
    fs::write(corpus.root().join("assets").join("broken.txt"), b"abc \xff\xff def\n").unwrap();
    let recognition_path = corpus.write_recognition_cp949(&[
        (corpus.clip("news.0001.wav"), "새 정책을 발표했다"),
        (corpus.clip("broken.0001.wav"), "깨진 문서"),
        (corpus.clip("news.0003.wav"), "전문가들은 신중한 접근을"),
    ]);
    let recognition = load_recognition(&recognition_path, "cp949").unwrap();

    let aligner = aligner(AlignerConfig::default());
    let outcome = BatchRunner::new(&aligner).run(&recognition).unwrap();

    let broken = corpus.clip("broken.0001.wav");
    assert_eq!(
        outcome.mapping[&broken],
        AlignmentResult::Unresolved("깨진 문서".to_string())
    );
    assert_eq!(outcome.report.counts.failed, 1);
    assert_eq!(outcome.report.failed_clips, vec![broken]);
    assert_eq!(outcome.report.counts.aligned, 2);
    assert!(outcome.mapping[&corpus.clip("news.0001.wav")].is_aligned());
    assert!(outcome.mapping[&corpus.clip("news.0003.wav")].is_aligned());
}

#[test]
fn empty_recognition_writes_empty_mapping() {
    let corpus = Corpus::new();
    let recognition_path = corpus.write_recognition_cp949(&[]);
    let recognition = load_recognition(&recognition_path, "cp949").unwrap();
    assert!(recognition.is_empty());

    let aligner = aligner(AlignerConfig::default());
    let outcome = BatchRunner::new(&aligner).run(&recognition).unwrap();
    assert_eq!(outcome.report.counts.processed, 0);
    assert_eq!(outcome.report.found_ratio, 0.0);

    let out = corpus.root().join("alignment.json");
    write_mapping(&out, &outcome.mapping).unwrap();
    assert_eq!(fs::read_to_string(&out).unwrap(), "{}\n");
}

#[test]
fn malformed_recognition_file_is_an_error() {
    let corpus = Corpus::new();
    let path = corpus.root().join("recognition.json");
    fs::write(&path, b"{ not json").unwrap();
    assert!(load_recognition(&path, "utf-8").is_err());
    assert!(load_recognition(&corpus.root().join("absent.json"), "utf-8").is_err());
}
