use crate::core::Pipeline;
use crate::utils::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub output_path: String,
    pub workbooks: usize,
    pub accepted: usize,
    pub skipped: usize,
}

pub struct ConversionEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ConversionEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn run(&self) -> Result<RunSummary> {
        // Extract
        let inputs = self.pipeline.extract()?;
        let workbooks = inputs.len();
        if workbooks == 0 {
            tracing::warn!("No .xlsx files found in the working directory");
        } else {
            tracing::info!("Found {} workbook(s)", workbooks);
        }

        // Transform
        let result = self.pipeline.transform(inputs)?;
        tracing::info!(
            "Accepted {} row(s), skipped {}",
            result.accepted_count(),
            result.skipped.len()
        );

        // Load
        let output_path = self.pipeline.load(&result)?;
        tracing::info!("📁 Output saved to: {}", output_path);

        Ok(RunSummary {
            output_path,
            workbooks,
            accepted: result.accepted_count(),
            skipped: result.skipped.len(),
        })
    }
}
