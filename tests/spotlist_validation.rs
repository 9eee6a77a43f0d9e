//! Spot list validation tests
//!
//! Every malformed list is rejected at the offending entry with its line
//! number and raw text; well-formed lists are accepted regardless of the
//! line terminator convention.

use std::fs;

use read_filter_redact::spotlist::{
    validate_list, InputDir, SpotId, SpotListErrorCode, SpotListReader, SpotListResult,
};
use tempfile::TempDir;

fn collect(input: &[u8], max: SpotId) -> (Vec<SpotId>, SpotListResult<()>) {
    let mut reader = SpotListReader::new(input, "ids.txt", 1, max);
    let mut ids = Vec::new();
    loop {
        match reader.next_id() {
            Ok(Some(id)) => ids.push(id),
            Ok(None) => return (ids, Ok(())),
            Err(e) => return (ids, Err(e)),
        }
    }
}

#[test]
fn test_every_terminator_yields_same_ids() {
    for input in [
        &b"1\n5\n9\n"[..],
        b"1\r5\r9\r",
        b"1\r\n5\r\n9\r\n",
        b"1\n\r5\n\r9\n\r",
        b"1\n5\n9",
    ] {
        let (ids, result) = collect(input, 10);
        assert!(result.is_ok(), "input {:?}", input);
        assert_eq!(ids, vec![1, 5, 9], "input {:?}", input);
    }
}

#[test]
fn test_blank_lines_and_padding_are_ignored() {
    let (ids, result) = collect(b"\n  2 \n\t\n\t4\t\n\n", 10);
    assert!(result.is_ok());
    assert_eq!(ids, vec![2, 4]);
}

#[test]
fn test_out_of_order_rejected_after_first() {
    let (ids, result) = collect(b"3\n2\n", 10);
    assert_eq!(ids, vec![3]);
    let err = result.unwrap_err();
    assert_eq!(err.code(), SpotListErrorCode::RfrListUnsorted);
    assert_eq!(err.line_number(), Some(2));
    assert_eq!(err.line_text(), Some("2"));
}

#[test]
fn test_duplicate_rejected_after_first() {
    let (ids, result) = collect(b"5\n5\n", 10);
    assert_eq!(ids, vec![5]);
    assert_eq!(result.unwrap_err().code(), SpotListErrorCode::RfrListDuplicate);
}

#[test]
fn test_rejections_by_kind() {
    let cases: [(&[u8], SpotListErrorCode); 5] = [
        (b"0\n", SpotListErrorCode::RfrListZeroId),
        (b"1x\n", SpotListErrorCode::RfrListBadCharacter),
        (b"-1\n", SpotListErrorCode::RfrListBadCharacter),
        (b"11\n", SpotListErrorCode::RfrListOutOfRange),
        (b"99999999999999999999999\n", SpotListErrorCode::RfrListOutOfRange),
    ];
    for (input, code) in cases {
        let (ids, result) = collect(input, 10);
        assert!(ids.is_empty());
        assert_eq!(result.unwrap_err().code(), code, "input {:?}", input);
    }
}

#[test]
fn test_line_buffer_limit() {
    let mut fits = "0".repeat(254);
    fits.push('1');
    let (ids, result) = collect(format!("{}\n", fits).as_bytes(), 10);
    assert!(result.is_ok());
    assert_eq!(ids, vec![1]);

    let mut long = "0".repeat(255);
    long.push('1');
    let (_, result) = collect(format!("{}\n", long).as_bytes(), 10);
    assert_eq!(result.unwrap_err().code(), SpotListErrorCode::RfrListLineTooLong);
}

#[test]
fn test_error_display_names_file_and_line() {
    let (_, result) = collect(b"4\n4\n", 10);
    let display = result.unwrap_err().to_string();
    assert!(display.contains("RFR_LIST_DUPLICATE"));
    assert!(display.contains("ids.txt"));
    assert!(display.contains("line 2"));
}

#[test]
fn test_validate_list_from_directory() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("ids.txt"), "2\n3\n8\n").unwrap();

    let input = InputDir::at(dir.path());
    let reader = SpotListReader::open(&input, "ids.txt".as_ref(), 1, 8).unwrap();
    let summary = validate_list(reader).unwrap();

    assert_eq!(summary.count, 3);
    assert_eq!(summary.first, Some(2));
    assert_eq!(summary.last, Some(8));
}

#[test]
fn test_missing_list_file() {
    let dir = TempDir::new().unwrap();
    let input = InputDir::at(dir.path());
    let err = SpotListReader::open(&input, "absent.txt".as_ref(), 1, 8).err().unwrap();
    assert_eq!(err.code(), SpotListErrorCode::RfrListNotFound);
}
