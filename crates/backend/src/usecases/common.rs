//! Общее для UseCase: последовательный пакетный прогон и ошибки операций

use async_trait::async_trait;
use contracts::domain::a003_product::aggregate::Product;
use contracts::usecases::common::{BatchItemResult, BatchReport};
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::shared::format::format_elapsed;
use crate::shared::logger;

/// Ошибки операции над товаром, которые handler отдаёт как 4xx
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Product has no images")]
    NoImages,

    #[error("{0}")]
    Invalid(String),
}

/// Обработка одного элемента пакета
#[async_trait]
pub trait BatchItemProcessor: Send + Sync {
    /// Название для отчёта; при None в отчёт идёт сам ID
    async fn display_name(&self, product_id: &str) -> Option<String>;

    /// Обработать элемент, вернуть сообщение об успехе
    async fn process(&self, product_id: &str) -> anyhow::Result<String>;
}

/// Последовательно обработать список: по порядку, пауза между элементами,
/// ошибка элемента записывается в его результат и не прерывает пакет
pub async fn run_sequential<P>(
    processor: &P,
    product_ids: &[String],
    pause: Duration,
    category: &str,
) -> BatchReport
where
    P: BatchItemProcessor + ?Sized,
{
    let started = Instant::now();
    let mut report = BatchReport::default();

    tracing::info!("[{}] Batch started: {} items", category, product_ids.len());

    for (index, product_id) in product_ids.iter().enumerate() {
        if index > 0 && !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }

        let item_started = Instant::now();
        let product_name = processor
            .display_name(product_id)
            .await
            .unwrap_or_else(|| product_id.clone());

        let outcome = processor.process(product_id).await;
        let duration = item_started.elapsed().as_millis() as u64;

        let result = match outcome {
            Ok(message) => {
                tracing::info!(
                    "[{}] {}/{} {} ok in {}",
                    category,
                    index + 1,
                    product_ids.len(),
                    product_id,
                    format_elapsed(duration)
                );
                BatchItemResult::ok(product_id.as_str(), product_name, message, duration)
            }
            Err(e) => {
                tracing::error!(
                    "[{}] {}/{} {} failed: {}",
                    category,
                    index + 1,
                    product_ids.len(),
                    product_id,
                    e
                );
                BatchItemResult::failed(product_id.as_str(), product_name, e.to_string(), duration)
            }
        };
        report.push(result);
    }

    report.total_time = started.elapsed().as_millis() as u64;

    let summary = format!(
        "Batch finished: {} total, {} ok, {} errors in {}",
        report.total,
        report.success,
        report.errors,
        format_elapsed(report.total_time)
    );
    tracing::info!("[{}] {}", category, summary);
    logger::log(category, &summary);

    report
}

/// Плейсхолдеры шаблона промпта для товара
pub fn product_prompt_vars<'a>(
    product: &'a Product,
    image_analysis: Option<&'a str>,
) -> Vec<(&'static str, Option<&'a str>)> {
    vec![
        ("product_name", Some(product.display_name())),
        ("brand", product.brand_name.as_deref()),
        ("category", product.category_name.as_deref()),
        ("ref_id", product.ref_id.as_deref()),
        ("description", product.product_description.as_deref()),
        ("title", product.title.as_deref()),
        ("image_analysis", image_analysis),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FakeProcessor {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl BatchItemProcessor for FakeProcessor {
        async fn display_name(&self, product_id: &str) -> Option<String> {
            if product_id.starts_with("missing") {
                None
            } else {
                Some(format!("Produto {}", product_id))
            }
        }

        async fn process(&self, product_id: &str) -> anyhow::Result<String> {
            self.calls.lock().unwrap().push(product_id.to_string());
            if product_id.contains("bad") {
                anyhow::bail!("boom {}", product_id)
            }
            Ok("done".into())
        }
    }

    fn ids(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_failures_do_not_abort_batch() {
        let processor = FakeProcessor {
            calls: Mutex::new(Vec::new()),
        };
        let input = ids(&["1", "bad-2", "3", "missing-bad"]);
        let report = run_sequential(&processor, &input, Duration::ZERO, "test").await;

        assert_eq!(report.total, 4);
        assert_eq!(report.success, 2);
        assert_eq!(report.errors, 2);
        assert_eq!(report.total, report.results.len());
        assert_eq!(*processor.calls.lock().unwrap(), input);

        let order: Vec<&str> = report.results.iter().map(|r| r.product_id.as_str()).collect();
        assert_eq!(order, vec!["1", "bad-2", "3", "missing-bad"]);
        assert_eq!(report.results[0].product_name, "Produto 1");
        assert_eq!(report.results[3].product_name, "missing-bad");
        assert_eq!(report.results[1].error.as_deref(), Some("boom bad-2"));
        assert!(report.results.iter().all(|r| r.duration.is_some()));
    }

    #[tokio::test]
    async fn test_empty_and_duplicates() {
        let processor = FakeProcessor {
            calls: Mutex::new(Vec::new()),
        };
        let report = run_sequential(&processor, &[], Duration::from_millis(50), "test").await;
        assert_eq!(report.total, 0);
        assert!(report.results.is_empty());

        let report = run_sequential(&processor, &ids(&["7", "7"]), Duration::ZERO, "test").await;
        assert_eq!(report.total, 2);
        assert_eq!(processor.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_pause_only_between_items() {
        let processor = FakeProcessor {
            calls: Mutex::new(Vec::new()),
        };
        let pause = Duration::from_millis(30);

        let started = Instant::now();
        run_sequential(&processor, &ids(&["1", "2", "3"]), pause, "test").await;
        assert!(started.elapsed() >= pause * 2);

        let started = Instant::now();
        run_sequential(&processor, &ids(&["1"]), Duration::from_millis(500), "test").await;
        assert!(started.elapsed() < Duration::from_millis(500));
    }
}
