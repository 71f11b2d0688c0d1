//! Blocking entry points for callers without an async runtime.

use std::future::Future;

use crate::core::config::PosterConfig;
use crate::pipeline::{PosterPipeline, PosterRequest, PosterSummary, StatusSink};
use crate::rendering::canvas::Canvas;
use crate::theme::Theme;
use crate::Result;

/// Drives `future` to completion on a fresh current-thread tokio runtime.
pub fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(future))
}

/// Builds a pipeline from `config` and runs one request to completion.
pub fn render_blocking<C>(
    config: &PosterConfig,
    request: &PosterRequest,
    theme: &Theme,
    canvas: &mut C,
    status: &dyn StatusSink,
) -> Result<PosterSummary>
where
    C: Canvas + ?Sized,
{
    let pipeline = PosterPipeline::from_config(config)?;
    block_on(pipeline.run(request, theme, canvas, status))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_on() {
        let value = block_on(async { 6 * 7 }).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_render_blocking_rejects_bad_config() {
        let config = PosterConfig {
            radius_m: -1.0,
            ..PosterConfig::default()
        };
        let mut canvas = crate::rendering::canvas::RecordingCanvas::new(10.0, 10.0);
        let err = render_blocking(
            &config,
            &PosterRequest::new("Oslo", ""),
            &Theme::default(),
            &mut canvas,
            &crate::pipeline::Silent,
        )
        .unwrap_err();
        assert!(matches!(err, crate::Error::InvalidConfig(_)));
    }
}
