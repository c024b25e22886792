// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

#[cfg(test)]
mod tests {
    use geotrace::utils::telemetry;

    #[test]
    fn test_telemetry_initialization_is_idempotent() {
        telemetry::init_telemetry();
        // 第二次调用不应 panic
        telemetry::init_telemetry();

        tracing::debug!("This is a debug message");
        tracing::warn!(ip = "8.8.8.8", "Lookup failed");

        let error_result: Result<(), &str> = Err("Test error");
        if let Err(e) = error_result {
            tracing::error!(error = e, "Operation failed");
        }
    }
}
