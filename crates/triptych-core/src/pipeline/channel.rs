//! Bounded channels for backpressure between pipeline stages.

use tokio::sync::mpsc;

use crate::config::PipelineConfig;

/// Create a bounded channel pair with the configured buffer size.
///
/// When the buffer is full the sender blocks, so a slow consumer
/// throttles the producer instead of queueing unboundedly.
pub fn bounded_channel<T>(config: &PipelineConfig) -> (mpsc::Sender<T>, mpsc::Receiver<T>) {
    mpsc::channel(config.buffer_size)
}

/// A pipeline stage that transforms or drops items.
///
/// Pulls from an input channel and pushes to an output channel. The
/// stage function returns `Some(output)` to forward an item or `None`
/// to drop it, which makes drops explicit in the type system.
pub struct PipelineStage<I, O> {
    input: mpsc::Receiver<I>,
    output: mpsc::Sender<O>,
}

impl<I, O> PipelineStage<I, O> {
    /// Create a new pipeline stage.
    pub fn new(input: mpsc::Receiver<I>, output: mpsc::Sender<O>) -> Self {
        Self { input, output }
    }

    /// Run the stage to completion.
    ///
    /// Finishes when the input channel closes; dropping the stage's
    /// sender is what signals completion downstream.
    pub async fn run<F, Fut>(mut self, f: F)
    where
        F: Fn(I) -> Fut,
        Fut: std::future::Future<Output = Option<O>>,
    {
        while let Some(item) = self.input.recv().await {
            if let Some(result) = f(item).await {
                if self.output.send(result).await.is_err() {
                    // Downstream closed, stop processing
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bounded_channel() {
        let config = PipelineConfig {
            buffer_size: 10,
            ..Default::default()
        };

        let (tx, mut rx) = bounded_channel::<i32>(&config);

        tx.send(42).await.unwrap();
        assert_eq!(rx.recv().await, Some(42));
    }

    #[tokio::test]
    async fn test_pipeline_stage_transforms() {
        let (input_tx, input_rx) = mpsc::channel::<i32>(10);
        let (output_tx, mut output_rx) = mpsc::channel::<i32>(10);

        let stage = PipelineStage::new(input_rx, output_tx);
        tokio::spawn(async move {
            stage.run(|x| async move { Some(x * 2) }).await;
        });

        input_tx.send(5).await.unwrap();
        input_tx.send(10).await.unwrap();
        drop(input_tx);

        assert_eq!(output_rx.recv().await, Some(10));
        assert_eq!(output_rx.recv().await, Some(20));
        assert_eq!(output_rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_pipeline_stage_drops_none() {
        let (input_tx, input_rx) = mpsc::channel::<i32>(10);
        let (output_tx, mut output_rx) = mpsc::channel::<i32>(10);

        let stage = PipelineStage::new(input_rx, output_tx);
        tokio::spawn(async move {
            stage
                .run(|x| async move { if x % 2 == 0 { Some(x) } else { None } })
                .await;
        });

        for i in 1..=4 {
            input_tx.send(i).await.unwrap();
        }
        drop(input_tx);

        assert_eq!(output_rx.recv().await, Some(2));
        assert_eq!(output_rx.recv().await, Some(4));
        assert_eq!(output_rx.recv().await, None);
    }
}
