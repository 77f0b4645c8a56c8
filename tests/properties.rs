use proptest::prelude::*;

use soil_breakdown::data::model::{CellValue, Dataset, Sample};
use soil_breakdown::pipeline::columns::*;
use soil_breakdown::pipeline::run_stages;
use soil_breakdown::PipelineConfig;

fn build(rows: &[(f64, f64, f64)]) -> Dataset {
    Dataset::new(
        vec![
            "sample_id".into(),
            CONCENTRATION_INITIAL.into(),
            CONCENTRATION_FINAL.into(),
            SOIL_MOISTURE.into(),
        ],
        rows.iter()
            .enumerate()
            .map(|(i, &(initial, final_, moisture))| {
                Sample::new(vec![
                    CellValue::Integer(i as i64),
                    CellValue::Float(initial),
                    CellValue::Float(final_),
                    CellValue::Float(moisture),
                ])
            })
            .collect(),
    )
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn derived_columns_follow_formulas(
        rows in prop::collection::vec((0.001f64..1e4, 0.0f64..1e4, 0.0f64..100.0), 0..40),
        reference in 0.1f64..100.0,
    ) {
        let original = build(&rows);
        let mut ds = original.clone();
        let cfg = PipelineConfig { reference_moisture: reference, ..Default::default() };
        let summary = run_stages(&mut ds, &cfg).unwrap();

        prop_assert_eq!(summary.rows, rows.len());
        prop_assert_eq!(summary.flagged_rows, 0);
        prop_assert_eq!(ds.len(), original.len());

        let rate = ds.numeric_column(BREAKDOWN_RATE).unwrap();
        let corrected = ds.numeric_column(CORRECTED_BREAKDOWN_RATE).unwrap();
        for (i, &(initial, final_, moisture)) in rows.iter().enumerate() {
            prop_assert!(close(rate[i], (initial - final_) / initial));
            prop_assert!(close(corrected[i], rate[i] * (moisture / reference)));
        }

        // Original columns and row order are untouched.
        for (before, after) in original.samples.iter().zip(&ds.samples) {
            prop_assert_eq!(&after.cells[..before.cells.len()], &before.cells[..]);
        }
    }

    #[test]
    fn moisture_at_reference_is_identity(
        initial in 0.001f64..1e4,
        final_ in 0.0f64..1e4,
        reference in 0.1f64..100.0,
    ) {
        let mut ds = build(&[(initial, final_, reference)]);
        let cfg = PipelineConfig { reference_moisture: reference, ..Default::default() };
        run_stages(&mut ds, &cfg).unwrap();
        let rate = ds.numeric_column(BREAKDOWN_RATE).unwrap()[0];
        let corrected = ds.numeric_column(CORRECTED_BREAKDOWN_RATE).unwrap()[0];
        prop_assert_eq!(rate, corrected);
    }

    #[test]
    fn non_positive_reference_is_rejected(reference in -100.0f64..=0.0) {
        let original = build(&[(100.0, 60.0, 30.0)]);
        let mut ds = original.clone();
        let cfg = PipelineConfig { reference_moisture: reference, ..Default::default() };
        prop_assert!(run_stages(&mut ds, &cfg).is_err());
        prop_assert_eq!(ds, original);
    }
}
