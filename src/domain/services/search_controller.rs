// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::geo::{GeoProvider, LookupError};
use crate::domain::models::{GeoRecord, HistoryEntry};
use crate::domain::services::history_service::{HistoryError, HistoryStore};
use crate::utils::errors::{Classify, ErrorKind};
use crate::utils::validators::{validate_ipv4, ValidationError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// 查询错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Failed to fetch geolocation data for this IP")]
    Lookup(LookupError),
    #[error("Failed to load your geolocation.")]
    Session(LookupError),
}

impl Classify for SearchError {
    fn kind(&self) -> ErrorKind {
        match self {
            SearchError::Validation(e) => e.kind(),
            SearchError::Lookup(e) | SearchError::Session(e) => e.kind(),
        }
    }
}

/// 查询状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    Validating,
    Loading,
    Success,
    Failed,
}

impl SearchPhase {
    /// 合法的状态转换
    ///
    /// `Success` 与 `Failed` 都回到 `Idle`。查询或历史写入进行中允许再次提交
    pub fn can_transition_to(self, next: SearchPhase) -> bool {
        use SearchPhase::*;
        matches!(
            (self, next),
            (Idle | Loading | Success, Validating)
                | (Validating, Loading | Failed)
                | (Loading, Success | Failed)
                | (Success | Failed, Idle)
                | (Idle, Idle)
        )
    }
}

/// 展示层可观察的查询视图
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchView {
    pub phase: SearchPhase,
    /// 搜索框内容
    pub input: String,
    /// 当前展示的位置
    pub current: Option<GeoRecord>,
    /// 会话默认位置（调用者自身的IP）
    pub session: Option<GeoRecord>,
    pub loading: bool,
    pub error: Option<String>,
}

/// 一次提交的结果
#[derive(Debug)]
pub enum SearchOutcome {
    /// 查询成功并已展示；历史写入失败时携带该错误
    Success {
        record: GeoRecord,
        history_error: Option<HistoryError>,
    },
    /// 校验或查询失败，之前展示的结果保持不变
    Failed(SearchError),
    /// 完成时已有更新的请求，结果被丢弃
    Superseded,
}

/// IP 查询控制器
///
/// 负责输入校验、发起查询以及最后请求优先的结果应用。每次提交领取一个
/// 单调递增的序号，完成时序号已不是最新的响应直接丢弃，既不更新展示也不
/// 写入历史。
pub struct SearchController {
    provider: Arc<dyn GeoProvider>,
    history: Arc<HistoryStore>,
    sequence: AtomicU64,
    view: watch::Sender<SearchView>,
}

impl SearchController {
    pub fn new(provider: Arc<dyn GeoProvider>, history: Arc<HistoryStore>) -> Self {
        let (view, _) = watch::channel(SearchView::default());
        Self {
            provider,
            history,
            sequence: AtomicU64::new(0),
            view,
        }
    }

    pub fn history(&self) -> &Arc<HistoryStore> {
        &self.history
    }

    /// 当前视图快照
    pub fn view(&self) -> SearchView {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchView> {
        self.view.subscribe()
    }

    /// 加载调用者自身的位置，作为会话默认值和初始展示结果
    pub async fn init_session(&self) -> Result<GeoRecord, SearchError> {
        let issued_at = self.sequence.load(Ordering::SeqCst);
        self.update(|v| v.loading = true);

        let result = self.provider.fetch_self().await;
        let still_current = self.sequence.load(Ordering::SeqCst) == issued_at;

        match result {
            Ok(record) => {
                info!("Session location resolved to {}", record.ip);
                self.update(|v| {
                    v.session = Some(record.clone());
                    if still_current {
                        v.current = Some(record.clone());
                        v.loading = false;
                    }
                });
                Ok(record)
            }
            Err(e) => {
                warn!("Failed to load own geolocation via {}: {}", self.provider.name(), e);
                let err = SearchError::Session(e);
                if still_current {
                    self.update(|v| {
                        v.loading = false;
                        v.error = Some(err.to_string());
                    });
                }
                Err(err)
            }
        }
    }

    /// 提交一次查询
    pub async fn submit(&self, input: &str) -> SearchOutcome {
        let token = self.next_token();
        let ip = input.trim().to_string();

        self.update(|v| {
            v.input = ip.clone();
            Self::transition(v, SearchPhase::Validating);
        });

        if let Err(e) = validate_ipv4(&ip) {
            debug!("Rejected input {:?}: {}", ip, e);
            let err = SearchError::Validation(e);
            self.fail(&err);
            return SearchOutcome::Failed(err);
        }

        self.update(|v| {
            Self::transition(v, SearchPhase::Loading);
            v.loading = true;
            v.error = None;
        });

        debug!("Looking up {} (request {})", ip, token);
        let result = self.provider.fetch_by_ip(&ip).await;

        if !self.is_latest(token) {
            debug!("Discarding stale response for {} (request {})", ip, token);
            return SearchOutcome::Superseded;
        }

        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!("Lookup of {} failed: {}", ip, e);
                let err = SearchError::Lookup(e);
                self.fail(&err);
                return SearchOutcome::Failed(err);
            }
        };

        self.update(|v| {
            Self::transition(v, SearchPhase::Success);
            v.loading = false;
            v.current = Some(record.clone());
            v.input = ip.clone();
        });

        let history_error = self.history.record(&ip, &record).await.err();

        if self.is_latest(token) {
            self.update(|v| {
                if let Some(e) = &history_error {
                    v.error = Some(e.user_message().to_string());
                }
                Self::transition(v, SearchPhase::Idle);
            });
        }

        SearchOutcome::Success {
            record,
            history_error,
        }
    }

    /// 更新搜索框内容，清除错误
    pub fn set_input(&self, text: &str) {
        self.update(|v| {
            v.input = text.to_string();
            v.error = None;
        });
    }

    /// 恢复会话默认位置，清空搜索框和错误
    ///
    /// 进行中的查询随之作废
    pub fn clear(&self) {
        self.next_token();
        self.update(|v| {
            v.current = v.session.clone();
            v.input.clear();
            v.error = None;
            v.loading = false;
            v.phase = SearchPhase::Idle;
        });
    }

    /// 展示一条历史记录，不发起网络请求
    pub fn show_history_entry(&self, entry: &HistoryEntry) {
        self.next_token();
        self.update(|v| {
            v.current = Some(entry.geo.clone());
            v.input = entry.ip.clone();
            v.error = None;
            v.loading = false;
            v.phase = SearchPhase::Idle;
        });
    }

    /// 失败后带着错误信息回到 `Idle`，之前展示的结果保持不变
    fn fail(&self, err: &SearchError) {
        self.update(|v| {
            Self::transition(v, SearchPhase::Failed);
            v.loading = false;
            v.error = Some(err.to_string());
        });
        self.update(|v| Self::transition(v, SearchPhase::Idle));
    }

    fn next_token(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_latest(&self, token: u64) -> bool {
        self.sequence.load(Ordering::SeqCst) == token
    }

    fn transition(view: &mut SearchView, next: SearchPhase) {
        if !view.phase.can_transition_to(next) {
            debug!("Unexpected phase change {:?} -> {:?}", view.phase, next);
        }
        view.phase = next;
    }

    fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut SearchView),
    {
        self.view.send_modify(f);
    }
}
