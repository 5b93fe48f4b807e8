//! Client-side aggregate over a record snapshot, mirroring what `GET /stats`
//! reports. Used when the caller asks for stats computed locally.

use std::collections::HashSet;

use crate::ctc::{extract_fixed_value, extract_labelled_ctc, extract_stipend_value};
use crate::model::{PlacementRecord, Stats};

pub fn summarize(records: &[PlacementRecord]) -> Stats {
    if records.is_empty() {
        return Stats::default();
    }

    let unique: HashSet<&str> = records.iter().map(|r| r.company_name.as_str()).collect();
    let ppo: HashSet<&str> = records
        .iter()
        .filter(|r| r.type_of_offer.to_uppercase().contains("PPO"))
        .map(|r| r.company_name.as_str())
        .collect();

    let mut stipends: Vec<(f64, u32)> = Vec::new();
    let mut ctcs: Vec<f64> = Vec::new();
    let mut fixed: Vec<(f64, u32)> = Vec::new();
    let mut intern_count = 0u64;
    let mut fte_count = 0u64;
    let mut intern_fte_count = 0u64;

    for record in records {
        let text = record.ctc_stipend.trim();
        let selected = record.students_selected;

        if let Some(stipend) = extract_stipend_value(text) {
            stipends.push((stipend, selected));
        }
        if let Some(ctc) = extract_labelled_ctc(text) {
            ctcs.push(ctc);
        }
        if let Some(value) = extract_fixed_value(text) {
            fixed.push((value, selected));
        }

        let offer = record.type_of_offer.to_lowercase();
        let intern = offer.contains("intern");
        let fte = offer.contains("fte");
        match (intern, fte) {
            (true, false) => intern_count += u64::from(selected),
            (false, true) => fte_count += u64::from(selected),
            (true, true) => intern_fte_count += u64::from(selected),
            (false, false) => {}
        }
    }

    let fixed_values: Vec<f64> = fixed.iter().map(|(v, _)| *v).collect();

    Stats {
        total_unique_companies: unique.len() as u64,
        on_campus: (unique.len() - ppo.len()) as u64,
        ppo: ppo.len() as u64,
        average_stipend: weighted_average(&stipends),
        average_ctc: mean(&ctcs),
        average_ctc_weighted: weighted_average(&fixed),
        median_ctc: median(&fixed_values),
        students_selected: records.iter().map(|r| u64::from(r.students_selected)).sum(),
        intern_count,
        fte_count,
        intern_fte_count,
    }
}

/// Average of values weighted by students selected; 0 when no weight.
fn weighted_average(pairs: &[(f64, u32)]) -> f64 {
    let total_weight: u64 = pairs.iter().map(|(_, w)| u64::from(*w)).sum();
    if total_weight == 0 {
        return 0.0;
    }
    let total: f64 = pairs.iter().map(|(v, w)| v * f64::from(*w)).sum();
    total / total_weight as f64
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
