//! Fuzz target for upload reading and batch distribution.
//!
//! Checks that row reading never panics and that distribution always yields
//! exactly one record per row.

#![no_main]

use feedmark::{BatchDistributor, RowReader};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10_000 {
        return;
    }

    let input = String::from_utf8_lossy(data).into_owned();
    let (upload, bulk) = input.split_once('\u{0}').unwrap_or((input.as_str(), ""));

    if let Ok(rows) = RowReader::new().read_str(upload) {
        let records = BatchDistributor::distribute(bulk, &rows);
        assert_eq!(records.len(), rows.len());

        let grouped = BatchDistributor::group_by_owner(records);
        assert_eq!(grouped.values().map(Vec::len).sum::<usize>(), rows.len());
    }
});
