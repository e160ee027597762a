//! Sample memory events seeded when no persisted collection exists.

use chrono::{DateTime, NaiveDate, Utc};
use hearth_types::MemoryEvent;

/// `(subject, date, title, content)` for each seeded event.
pub const SAMPLE_EVENTS: [(&str, (i32, u32, u32), &str, &str); 5] = [
    (
        "妈妈",
        (2019, 5, 12),
        "母亲节的花",
        "第一次用自己的零花钱给妈妈买了一束康乃馨，她把花插在客厅里养了整整两个星期。",
    ),
    (
        "妈妈",
        (2022, 9, 10),
        "教师节",
        "妈妈的学生们回来看她，带了一张全班签名的贺卡，她笑得合不拢嘴。",
    ),
    (
        "爸爸",
        (2018, 7, 21),
        "水库钓鱼",
        "天还没亮就跟爸爸出门，钓了一上午只上来两条小鲫鱼，回家路上他一直说下次一定钓条大的。",
    ),
    (
        "爸爸",
        (2021, 6, 20),
        "父亲节晚饭",
        "一家人去了爸爸最爱的那家面馆，他难得多喝了一杯啤酒。",
    ),
    (
        "奶奶",
        (2020, 1, 25),
        "春节包饺子",
        "奶奶手把手教我擀饺子皮，说边要薄、中间要厚，煮的时候才不会破。",
    ),
];

/// Build the sample events, all stamped with `created_at`.
pub fn sample_events_at(created_at: DateTime<Utc>) -> Vec<MemoryEvent> {
    SAMPLE_EVENTS
        .iter()
        .filter_map(|&(subject, (y, m, d), title, content)| {
            NaiveDate::from_ymd_opt(y, m, d)
                .map(|date| MemoryEvent::stamped_at(subject, date, title, content, created_at))
        })
        .collect()
}

/// Build the sample events stamped with the current time.
pub fn sample_events() -> Vec<MemoryEvent> {
    sample_events_at(Utc::now())
}
