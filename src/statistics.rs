use crate::history::ScanRecord;
use crate::verdict::Status;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_scans: usize,
    pub safe: usize,
    pub suspicious: usize,
    pub phishing: usize,
    pub safe_percent: u32,
    pub suspicious_percent: u32,
    pub phishing_percent: u32,
    /// Share of scans not classified as phishing; 100 with no scans.
    pub safety_score: u32,
    pub average_risk_score: f64,
    pub oldest_scan: Option<DateTime<Utc>>,
    pub latest_scan: Option<DateTime<Utc>>,
}

impl DashboardStats {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a ScanRecord>,
    {
        let mut total_scans = 0;
        let mut safe = 0;
        let mut suspicious = 0;
        let mut phishing = 0;
        let mut score_sum: u64 = 0;
        let mut oldest_scan: Option<DateTime<Utc>> = None;
        let mut latest_scan: Option<DateTime<Utc>> = None;

        for record in records {
            total_scans += 1;
            score_sum += u64::from(record.risk_score);
            match record.status {
                Status::Safe => safe += 1,
                Status::Suspicious => suspicious += 1,
                Status::Phishing => phishing += 1,
            }

            oldest_scan = Some(oldest_scan.map_or(record.timestamp, |t| t.min(record.timestamp)));
            latest_scan = Some(latest_scan.map_or(record.timestamp, |t| t.max(record.timestamp)));
        }

        let average_risk_score = if total_scans == 0 {
            0.0
        } else {
            score_sum as f64 / total_scans as f64
        };

        Self {
            total_scans,
            safe,
            suspicious,
            phishing,
            safe_percent: percentage(safe, total_scans),
            suspicious_percent: percentage(suspicious, total_scans),
            phishing_percent: percentage(phishing, total_scans),
            safety_score: if total_scans == 0 {
                100
            } else {
                percentage(total_scans - phishing, total_scans)
            },
            average_risk_score,
            oldest_scan,
            latest_scan,
        }
    }
}

/// Rounded share of `part` in `total`, 0 when `total` is 0.
pub fn percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((part as f64 / total as f64) * 100.0).round() as u32
}
