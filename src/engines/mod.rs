// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod chromium_engine;
pub mod reqwest_engine;
pub mod traits;

use crate::config::settings::{EngineKind, RendererSettings};
use crate::engines::chromium_engine::ChromiumEngine;
use crate::engines::reqwest_engine::ReqwestEngine;
use crate::engines::traits::{EngineError, RenderEngine};
use std::sync::Arc;

/// 根据配置创建渲染引擎
pub fn build_engine(settings: &RendererSettings) -> Result<Arc<dyn RenderEngine>, EngineError> {
    let engine: Arc<dyn RenderEngine> = match settings.engine {
        EngineKind::Chromium => Arc::new(ChromiumEngine::new(settings.clone())),
        EngineKind::Http => Arc::new(ReqwestEngine::new(settings)?),
    };
    Ok(engine)
}
