use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::models::worry::{Cheer, CheeredWorry, NewCheer, NewWorry, Stats, Worry};
use crate::store::{CheerInsert, WorryStore};

/// Worries shown on a fresh instance so the first draw has something to return.
const DEMO_WORRIES: &[(&str, &str, &[&str])] = &[
    (
        "푸른 바다 자판기",
        "취업 준비가 너무 길어지니까 자존감이 계속 낮아져요. 친구들은 다들 자리 잡는 것 같은데 저만 멈춰있는 기분입니다. 어떻게 하면 이 불안감을 떨쳐낼 수 있을까요?",
        &[
            "각자의 속도가 있는 법이에요. 당신은 늦은 게 아니라 준비 중인 거예요. 조급해하지 말고 자신을 믿어보세요.",
            "포기하지 않는 것만으로도 대단한 거예요. 곧 좋은 소식이 있을 거예요! 힘내세요!",
        ],
    ),
    (
        "꿈꾸는 고양이 구름",
        "좋아하는 사람이 생겼는데 용기가 안 나요. 거절당하면 어색해질까 봐 말도 못 걸겠어요. 그냥 멀리서 바라보는 게 최선일까요?",
        &[
            "후회하는 것보다 용기 내보는 게 낫지 않을까요? 당신의 진심은 분명히 통할 거예요.",
            "작은 인사부터 시작해보세요! 당신의 매력을 알아줄 사람이 분명히 있을 거예요.",
        ],
    ),
];

#[derive(Default)]
struct Tables {
    worries: Vec<Worry>,
    cheers: Vec<Cheer>,
    last_worry_id: i32,
    last_cheer_id: i32,
}

impl Tables {
    fn insert_worry(&mut self, new_worry: NewWorry) -> Worry {
        self.last_worry_id += 1;
        let worry = Worry {
            id: self.last_worry_id,
            content: new_worry.content,
            nickname: new_worry.nickname,
            created_at: Utc::now(),
        };
        self.worries.push(worry.clone());
        worry
    }

    fn insert_cheer(&mut self, new_cheer: NewCheer) -> Result<CheerInsert, AppError> {
        if !self.worries.iter().any(|w| w.id == new_cheer.worry_id) {
            return Err(AppError::NotFound(format!(
                "Worry {} not found",
                new_cheer.worry_id
            )));
        }

        if let Some(existing) = self
            .cheers
            .iter()
            .find(|c| c.worry_id == new_cheer.worry_id && c.content == new_cheer.content)
        {
            return Ok(CheerInsert::Duplicate(existing.clone()));
        }

        self.last_cheer_id += 1;
        let cheer = Cheer {
            id: self.last_cheer_id,
            worry_id: new_cheer.worry_id,
            content: new_cheer.content,
            created_at: Utc::now(),
        };
        self.cheers.push(cheer.clone());
        Ok(CheerInsert::Created(cheer))
    }
}

/// In-process store. A single mutex guards both tables, so every operation,
/// including check-then-insert for cheers, is atomic.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-filled with a couple of worries and their cheers.
    pub fn with_demo_data() -> Self {
        let mut tables = Tables::default();
        for (nickname, content, cheers) in DEMO_WORRIES {
            let worry = tables.insert_worry(NewWorry {
                content: content.to_string(),
                nickname: nickname.to_string(),
            });
            for cheer in *cheers {
                // The worry was inserted just above, so this cannot miss.
                let _ = tables.insert_cheer(NewCheer {
                    worry_id: worry.id,
                    content: cheer.to_string(),
                });
            }
        }
        info!("Memory store seeded with {} demo worries", tables.worries.len());
        Self {
            tables: Mutex::new(tables),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, AppError> {
        self.tables
            .lock()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Memory store lock poisoned: {e}")))
    }
}

fn newest_first<T, K: Ord>(items: &mut [T], key: impl Fn(&T) -> K) {
    items.sort_by_key(|item| std::cmp::Reverse(key(item)));
}

#[async_trait]
impl WorryStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn list_worries(&self, search: Option<&str>) -> Result<Vec<Worry>, AppError> {
        let needle = search.map(str::to_lowercase);
        let tables = self.lock()?;
        let mut worries: Vec<Worry> = tables
            .worries
            .iter()
            .filter(|w| match &needle {
                Some(n) => {
                    w.content.to_lowercase().contains(n.as_str())
                        || w.nickname.to_lowercase().contains(n.as_str())
                }
                None => true,
            })
            .cloned()
            .collect();
        newest_first(&mut worries, |w| (w.created_at, w.id));
        Ok(worries)
    }

    async fn get_worry(&self, id: i32) -> Result<Option<Worry>, AppError> {
        Ok(self.lock()?.worries.iter().find(|w| w.id == id).cloned())
    }

    async fn create_worry(&self, new_worry: NewWorry) -> Result<Worry, AppError> {
        let worry = self.lock()?.insert_worry(new_worry);
        info!("Inserted worry {} by '{}'", worry.id, worry.nickname);
        Ok(worry)
    }

    async fn worries_with_cheer_counts(&self) -> Result<Vec<CheeredWorry>, AppError> {
        let tables = self.lock()?;
        Ok(tables
            .worries
            .iter()
            .map(|w| CheeredWorry {
                worry: w.clone(),
                cheer_count: tables.cheers.iter().filter(|c| c.worry_id == w.id).count() as i64,
            })
            .collect())
    }

    async fn list_cheers(&self, worry_id: i32) -> Result<Vec<Cheer>, AppError> {
        let tables = self.lock()?;
        let mut cheers: Vec<Cheer> = tables
            .cheers
            .iter()
            .filter(|c| c.worry_id == worry_id)
            .cloned()
            .collect();
        newest_first(&mut cheers, |c| (c.created_at, c.id));
        Ok(cheers)
    }

    async fn create_cheer(&self, new_cheer: NewCheer) -> Result<CheerInsert, AppError> {
        let outcome = self.lock()?.insert_cheer(new_cheer)?;
        match &outcome {
            CheerInsert::Created(c) => info!("Inserted cheer {} for worry {}", c.id, c.worry_id),
            CheerInsert::Duplicate(c) => {
                debug!("Duplicate cheer {} for worry {} suppressed", c.id, c.worry_id)
            }
        }
        Ok(outcome)
    }

    async fn stats(&self) -> Result<Stats, AppError> {
        let tables = self.lock()?;
        Ok(Stats {
            total_worries: tables.worries.len() as i64,
            total_cheers: tables.cheers.len() as i64,
        })
    }
}
