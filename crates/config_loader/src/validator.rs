//! 配置校验模块
//!
//! 校验规则：
//! - producer_count >= 1
//! - endpoint_template 含 "{}" 占位符
//! - chunk_size > 0
//! - window.rows / window.cols > 0
//! - interval_secs 有限且 > 0
//! - result_endpoint 非空
//! - queue_capacity > 0
//! - model.classes >= 1

use contracts::{PipelineError, PredictorConfig};

/// 校验 PredictorConfig 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(config: &PredictorConfig) -> Result<(), PipelineError> {
    validate_ingest(config)?;
    validate_window(config)?;
    validate_dispatch(config)?;
    validate_model(config)?;
    Ok(())
}

/// 校验 ingest 配置
fn validate_ingest(config: &PredictorConfig) -> Result<(), PipelineError> {
    let ingest = &config.ingest;

    if ingest.producer_count == 0 {
        return Err(PipelineError::config_validation(
            "ingest.producer_count",
            "producer_count must be >= 1",
        ));
    }

    if !ingest.endpoint_template.contains("{}") {
        return Err(PipelineError::config_validation(
            "ingest.endpoint_template",
            format!(
                "endpoint_template '{}' has no {{}} placeholder",
                ingest.endpoint_template
            ),
        ));
    }

    if ingest.chunk_size == 0 {
        return Err(PipelineError::config_validation(
            "ingest.chunk_size",
            "chunk_size must be > 0",
        ));
    }

    Ok(())
}

/// 校验窗口形状
fn validate_window(config: &PredictorConfig) -> Result<(), PipelineError> {
    if config.window.rows == 0 {
        return Err(PipelineError::config_validation(
            "window.rows",
            "rows must be > 0",
        ));
    }
    if config.window.cols == 0 {
        return Err(PipelineError::config_validation(
            "window.cols",
            "cols must be > 0",
        ));
    }
    Ok(())
}

/// 校验 dispatch 配置
fn validate_dispatch(config: &PredictorConfig) -> Result<(), PipelineError> {
    let dispatch = &config.dispatch;

    if !dispatch.interval_secs.is_finite() || dispatch.interval_secs <= 0.0 {
        return Err(PipelineError::config_validation(
            "dispatch.interval_secs",
            format!(
                "interval_secs must be finite and > 0, got {}",
                dispatch.interval_secs
            ),
        ));
    }

    if dispatch.result_endpoint.is_empty() {
        return Err(PipelineError::config_validation(
            "dispatch.result_endpoint",
            "result_endpoint cannot be empty",
        ));
    }

    if dispatch.queue_capacity == 0 {
        return Err(PipelineError::config_validation(
            "dispatch.queue_capacity",
            "queue_capacity must be > 0",
        ));
    }

    Ok(())
}

/// 校验 model 配置
fn validate_model(config: &PredictorConfig) -> Result<(), PipelineError> {
    if config.model.classes == 0 {
        return Err(PipelineError::config_validation(
            "model.classes",
            "classes must be >= 1",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{DispatchConfig, IngestConfig, ModelConfig, WindowConfig};

    fn minimal_config() -> PredictorConfig {
        PredictorConfig {
            ingest: IngestConfig {
                producer_count: 3,
                endpoint_template: "/tmp/csi/producer_{}.sock".into(),
                chunk_size: 65536,
            },
            window: WindowConfig { rows: 10, cols: 64 },
            dispatch: DispatchConfig {
                interval_secs: 1.0,
                result_endpoint: "/tmp/csi/results.sock".into(),
                queue_capacity: 32,
            },
            model: ModelConfig {
                dir: "/opt/csi/model".into(),
                device: None,
                classes: 6,
            },
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&minimal_config()).is_ok());
    }

    #[test]
    fn test_zero_producer_count() {
        let mut config = minimal_config();
        config.ingest.producer_count = 0;
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("producer_count"), "got: {err}");
    }

    #[test]
    fn test_template_without_placeholder() {
        let mut config = minimal_config();
        config.ingest.endpoint_template = "/tmp/fixed.sock".into();
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("placeholder"), "got: {err}");
    }

    #[test]
    fn test_zero_chunk_size() {
        let mut config = minimal_config();
        config.ingest.chunk_size = 0;
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("chunk_size"), "got: {err}");
    }

    #[test]
    fn test_zero_window_dims() {
        let mut config = minimal_config();
        config.window.rows = 0;
        assert!(validate(&config).is_err());

        let mut config = minimal_config();
        config.window.cols = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_invalid_interval() {
        let mut config = minimal_config();
        config.dispatch.interval_secs = 0.0;
        assert!(validate(&config).is_err());

        let mut config = minimal_config();
        config.dispatch.interval_secs = f64::NAN;
        assert!(validate(&config).is_err());

        let mut config = minimal_config();
        config.dispatch.interval_secs = -1.0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_result_endpoint() {
        let mut config = minimal_config();
        config.dispatch.result_endpoint = String::new();
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("cannot be empty"), "got: {err}");
    }

    #[test]
    fn test_zero_classes() {
        let mut config = minimal_config();
        config.model.classes = 0;
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("classes"), "got: {err}");
    }
}
