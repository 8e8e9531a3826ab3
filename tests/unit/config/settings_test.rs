// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置设置测试模块
///
/// 测试环境变量覆盖默认配置

#[cfg(test)]
mod tests {
    use catalogrs::config::settings::{EngineKind, Settings, DEFAULT_SEED_URL};

    // Only this test touches CATALOGRS__* variables.
    #[test]
    fn test_environment_overrides_defaults() {
        std::env::set_var("CATALOGRS__CRAWL__MAX_PAGES", "7");
        std::env::set_var("CATALOGRS__RENDERER__ENGINE", "http");
        std::env::set_var("CATALOGRS__OUTPUT__PATH", "reports/laptops.xlsx");

        let result = Settings::new();

        std::env::remove_var("CATALOGRS__CRAWL__MAX_PAGES");
        std::env::remove_var("CATALOGRS__RENDERER__ENGINE");
        std::env::remove_var("CATALOGRS__OUTPUT__PATH");

        let settings = result.expect("settings load");
        assert_eq!(settings.crawl.max_pages, 7);
        assert_eq!(settings.renderer.engine, EngineKind::Http);
        assert_eq!(settings.output.path, "reports/laptops.xlsx");
        assert_eq!(settings.crawl.seed_url, DEFAULT_SEED_URL);
        assert_eq!(settings.output.sheet_name, "Products");
    }
}
