mod common;

use common::{write_archive, Harness, Sent, StubExtractor};
use tally_bot::{
    bot::{CANCELLED, HELP_TEXT, NOTHING_TO_CANCEL},
    conversation::{
        export_dialog::{END_BEFORE_START, END_PROMPT, INVALID_START, KIND_PROMPT, START_PROMPT, UNKNOWN_KIND},
        upload_dialog::{UPLOAD_PROMPT, UPLOAD_REPROMPT},
    },
};
use tally_config::Config;
use tally_core::{
    FileRef, IncomingMessage, RecordStore, ARCHIVE_COMPLETED, BATCH_COMPLETED, NOT_A_RECEIPT,
    NO_RECORDS, NO_RECORDS_IN_RANGE,
};
use tally_domain::{RecordKind, UserId};

fn user() -> UserId {
    UserId::new("42")
}

const MARCH_LEDGER: [&str; 3] = [
    "01-Mar-2024 00:00,Food,12.50",
    "15-Mar-2024 00:00,Transport,7.00",
    "02-Apr-2024 00:00,Food,3.10",
];

#[test]
fn export_dialog_delivers_filtered_history() {
    let mut harness = Harness::new(StubExtractor::default(), Config::default());
    harness.seed(&user(), &MARCH_LEDGER);

    harness.say(&user(), "/pdf");
    assert_eq!(
        harness.transport.drain(),
        vec![Sent::Choices(
            KIND_PROMPT.to_string(),
            vec!["Income".to_string(), "Expense".to_string()]
        )]
    );
    harness.say(&user(), "Expense");
    assert_eq!(harness.transport.last_text().as_deref(), Some(START_PROMPT));
    harness.say(&user(), "2024-03-01");
    assert_eq!(harness.transport.last_text().as_deref(), Some(END_PROMPT));
    harness.transport.drain();
    harness.say(&user(), "2024-03-31");

    let documents = harness.transport.documents();
    assert_eq!(documents.len(), 1);
    let (caption, body) = &documents[0];
    assert_eq!(caption, "Expense history from 2024-03-01 to 2024-03-31");
    assert!(body.contains("12.50$ Food on 2024-03-01"));
    assert!(body.contains("7.00$ Transport on 2024-03-15"));
    assert!(!body.contains("3.10$"));

    assert!(!harness.bot.sessions().is_active(&user()));
    assert!(!harness.home.join("exports").join("history_42.svg").exists());
}

#[test]
fn invalid_start_date_keeps_kind_and_reprompts() {
    let mut harness = Harness::new(StubExtractor::default(), Config::default());
    harness.seed(&user(), &MARCH_LEDGER);

    harness.say(&user(), "/pdf");
    harness.say(&user(), "Expense");
    harness.say(&user(), "2024-13-01");
    assert_eq!(harness.transport.last_text().as_deref(), Some(INVALID_START));
    assert!(harness.bot.sessions().is_active(&user()));

    harness.say(&user(), "2024-03-01");
    harness.say(&user(), "2024-03-02");
    let documents = harness.transport.documents();
    assert_eq!(documents.len(), 1);
    assert!(documents[0].0.starts_with("Expense history"));
}

#[test]
fn end_before_start_is_rejected_until_corrected() {
    let mut harness = Harness::new(StubExtractor::default(), Config::default());
    harness.seed(&user(), &MARCH_LEDGER);

    harness.say(&user(), "/pdf");
    harness.say(&user(), "Expense");
    harness.say(&user(), "2024-03-10");
    harness.say(&user(), "2024-03-01");
    assert_eq!(harness.transport.last_text().as_deref(), Some(END_BEFORE_START));
    assert!(harness.transport.documents().is_empty());

    harness.say(&user(), "2024-03-10");
    assert!(harness.transport.documents().is_empty());
    assert_eq!(
        harness.transport.last_text().as_deref(),
        Some(NO_RECORDS_IN_RANGE)
    );
}

#[test]
fn empty_ledger_sends_one_message_and_no_document() {
    let mut harness = Harness::new(StubExtractor::default(), Config::default());

    harness.say(&user(), "/pdf");
    harness.say(&user(), "Income");
    harness.say(&user(), "2024-01-01");
    harness.transport.drain();
    harness.say(&user(), "2024-12-31");

    assert_eq!(
        harness.transport.sent(),
        vec![Sent::Message(NO_RECORDS.to_string())]
    );
}

#[test]
fn unrecognized_kind_reads_expenses_in_permissive_mode() {
    let mut harness = Harness::new(StubExtractor::default(), Config::default());
    harness.seed(&user(), &MARCH_LEDGER);

    harness.say(&user(), "/pdf");
    harness.say(&user(), "Gifts");
    assert_eq!(harness.transport.last_text().as_deref(), Some(START_PROMPT));
    harness.say(&user(), "2024-03-01");
    harness.say(&user(), "2024-03-31");

    let documents = harness.transport.documents();
    assert_eq!(documents[0].0, "Gifts history from 2024-03-01 to 2024-03-31");
}

#[test]
fn strict_mode_reprompts_for_unknown_kind() {
    let config = Config {
        strict_kind_selection: true,
        ..Config::default()
    };
    let mut harness = Harness::new(StubExtractor::default(), config);

    harness.say(&user(), "/pdf");
    harness.say(&user(), "Gifts");
    assert_eq!(harness.transport.last_text().as_deref(), Some(UNKNOWN_KIND));
    harness.say(&user(), "income");
    assert_eq!(harness.transport.last_text().as_deref(), Some(START_PROMPT));
}

#[test]
fn cancel_clears_pending_dialog() {
    let mut harness = Harness::new(StubExtractor::default(), Config::default());

    harness.say(&user(), "/cancel");
    assert_eq!(harness.transport.last_text().as_deref(), Some(NOTHING_TO_CANCEL));

    harness.say(&user(), "/pdf");
    harness.say(&user(), "/cancel");
    assert_eq!(harness.transport.last_text().as_deref(), Some(CANCELLED));
    assert!(!harness.bot.sessions().is_active(&user()));

    harness.say(&user(), "2024-03-01");
    assert_eq!(harness.transport.last_text().as_deref(), Some(HELP_TEXT));
}

#[test]
fn dialogs_are_kept_per_user() {
    let mut harness = Harness::new(StubExtractor::default(), Config::default());
    let other = UserId::new("7");

    harness.say(&user(), "/pdf");
    harness.say(&other, "/scan");
    harness.say(&user(), "Expense");
    assert_eq!(harness.transport.last_text().as_deref(), Some(START_PROMPT));
    assert_eq!(harness.bot.sessions().len(), 2);
}

#[test]
fn scan_reprompts_until_receipts_arrive() {
    let extractor = StubExtractor::default().receipt("taxi.jpg", "2024-03-05", 18.0, "Transport");
    let mut harness = Harness::new(extractor, Config::default());
    let photo = harness.home.join("taxi.jpg");
    std::fs::write(&photo, b"jpeg").unwrap();

    harness.say(&user(), "/scan");
    assert_eq!(harness.transport.last_text().as_deref(), Some(UPLOAD_PROMPT));
    harness.say(&user(), "here you go");
    assert_eq!(harness.transport.last_text().as_deref(), Some(UPLOAD_REPROMPT));

    harness.send(IncomingMessage::photos(
        user(),
        vec![FileRef::named(photo.display().to_string(), "taxi.jpg")],
    ));
    assert_eq!(harness.transport.last_text().as_deref(), Some(BATCH_COMPLETED));
    assert!(!harness.bot.sessions().is_active(&user()));

    let lines = harness.store.read_all(&user(), RecordKind::Expense).unwrap();
    assert_eq!(lines, vec!["05-Mar-2024 00:00,Transport,18.00".to_string()]);
}

#[test]
fn archive_with_one_bad_image_reports_each_member() {
    let extractor = StubExtractor::default()
        .receipt("a.jpg", "2024-03-01", 12.5, "Food")
        .failure("b.png", "Image is too blurry.")
        .receipt("c.jpeg", "2024-03-03", 4.0, "Coffee");
    let mut harness = Harness::new(extractor, Config::default());
    let archive = write_archive(
        &harness.home,
        "receipts.zip",
        &[
            ("a.jpg", b"a"),
            ("notes.txt", b"ignored"),
            ("b.png", b"b"),
            ("c.jpeg", b"c"),
        ],
    );

    harness.send(IncomingMessage::document(
        user(),
        "receipts.zip",
        FileRef::named(archive.display().to_string(), "receipts.zip"),
    ));

    let messages: Vec<String> = harness
        .transport
        .sent()
        .into_iter()
        .filter_map(|sent| match sent {
            Sent::Message(text) => Some(text),
            _ => None,
        })
        .collect();
    assert_eq!(messages.len(), 4);
    assert!(messages[0].starts_with("Added successfully! to the database."));
    assert!(messages[0].contains("Category: Food"));
    assert_eq!(messages[1], "Image is too blurry.");
    assert!(messages[2].contains("Amount: 4.00"));
    assert_eq!(messages[3], ARCHIVE_COMPLETED);

    let lines = harness.store.read_all(&user(), RecordKind::Expense).unwrap();
    assert_eq!(lines.len(), 2);
}

#[test]
fn photo_that_is_not_a_receipt_is_reported() {
    let mut harness = Harness::new(StubExtractor::default(), Config::default());
    let photo = harness.home.join("cat.png");
    std::fs::write(&photo, b"png").unwrap();

    harness.send(IncomingMessage::photos(
        user(),
        vec![FileRef::named(photo.display().to_string(), "cat.png")],
    ));

    assert_eq!(
        harness.transport.sent(),
        vec![
            Sent::Message(NOT_A_RECEIPT.to_string()),
            Sent::Message(BATCH_COMPLETED.to_string()),
        ]
    );
    assert!(harness
        .store
        .read_all(&user(), RecordKind::Expense)
        .unwrap()
        .is_empty());
}

#[test]
fn missing_download_is_reported_to_the_user() {
    let mut harness = Harness::new(StubExtractor::default(), Config::default());

    harness.send(IncomingMessage::document(
        user(),
        "receipts.zip",
        FileRef::named("/no/such/receipts.zip", "receipts.zip"),
    ));

    let reply = harness.transport.last_text().unwrap();
    assert!(reply.starts_with("An error occurred while processing receipts"));
}

#[test]
fn unreadable_photo_does_not_stop_the_batch() {
    let extractor = StubExtractor::default()
        .receipt("a.jpg", "2024-03-01", 12.5, "Food")
        .receipt("c.jpg", "2024-03-03", 4.0, "Coffee");
    let mut harness = Harness::new(extractor, Config::default());
    let first = harness.home.join("a.jpg");
    let third = harness.home.join("c.jpg");
    std::fs::write(&first, b"a").unwrap();
    std::fs::write(&third, b"c").unwrap();

    harness.send(IncomingMessage::photos(
        user(),
        vec![
            FileRef::named(first.display().to_string(), "a.jpg"),
            FileRef::named("/no/such/b.jpg", "b.jpg"),
            FileRef::named(third.display().to_string(), "c.jpg"),
        ],
    ));

    let messages: Vec<String> = harness
        .transport
        .sent()
        .into_iter()
        .filter_map(|sent| match sent {
            Sent::Message(text) => Some(text),
            _ => None,
        })
        .collect();
    assert_eq!(messages.len(), 4);
    assert!(messages[0].contains("Category: Food"));
    assert!(messages[1].starts_with("Could not download receipt b.jpg"));
    assert!(messages[2].contains("Category: Coffee"));
    assert_eq!(messages[3], BATCH_COMPLETED);

    let lines = harness.store.read_all(&user(), RecordKind::Expense).unwrap();
    assert_eq!(
        lines,
        vec![
            "01-Mar-2024 00:00,Food,12.50".to_string(),
            "03-Mar-2024 00:00,Coffee,4.00".to_string(),
        ]
    );
}

#[test]
fn upload_during_export_dialog_keeps_the_dialog() {
    let extractor = StubExtractor::default().receipt("taxi.jpg", "2024-03-05", 18.0, "Transport");
    let mut harness = Harness::new(extractor, Config::default());
    let photo = harness.home.join("taxi.jpg");
    std::fs::write(&photo, b"jpeg").unwrap();

    harness.say(&user(), "/pdf");
    harness.say(&user(), "Expense");
    harness.send(IncomingMessage::photos(
        user(),
        vec![FileRef::named(photo.display().to_string(), "taxi.jpg")],
    ));
    assert_eq!(harness.transport.last_text().as_deref(), Some(BATCH_COMPLETED));
    assert!(harness.bot.sessions().is_active(&user()));

    harness.say(&user(), "2024-03-01");
    assert_eq!(harness.transport.last_text().as_deref(), Some(END_PROMPT));
    harness.say(&user(), "2024-03-31");
    let documents = harness.transport.documents();
    assert_eq!(documents.len(), 1);
    assert!(documents[0].1.contains("18.00$ Transport on 2024-03-05"));
}
