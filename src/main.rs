// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use clap::Parser;
use geotrace::application::context::AppContext;
use geotrace::config::settings::Settings;
use geotrace::presentation::{run_cli_command, Cli};
use geotrace::utils::telemetry;
use tracing::{debug, info};

/// 主函数
///
/// 初始化日志、加载配置、组装组件，然后执行命令
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();

    // 2. Parse arguments
    let cli = Cli::parse();

    // 3. Load configuration
    let settings = Settings::new()?;
    debug!("Configuration loaded: {:?}", settings);

    // 4. Wire components
    let ctx = AppContext::build(settings)?;
    info!("Starting geotrace ({} history)", ctx.history_mode());

    // 5. Run command
    if let Err(e) = run_cli_command(&ctx, cli.command).await {
        eprintln!("{}", e.format_colored());
        std::process::exit(1);
    }

    Ok(())
}
