//! Canned oracle output for driving the turn loop without a model.
//!
//! Used by the crate's own tests, by integration tests, and by anything
//! that wants to feed a [`ScriptedOracle`](crate::oracle::ScriptedOracle).

use prosperity_types::{
    IntelligenceLevel, InternalReport, Media, Sentiment, SimulationResponse, StreetView, WarRoom,
    WindowState,
};

/// A complete, valid window set with no street view image.
pub fn sample_windows() -> WindowState {
    WindowState {
        war_room: WarRoom {
            status: "黄色警戒".to_owned(),
            active_threats: vec!["港口罢工余波".to_owned()],
            resource_allocation: 60,
        },
        media: Media {
            headlines: vec![
                "内阁紧急会议持续至深夜".to_owned(),
                "聚变并网进度引发质疑".to_owned(),
            ],
            sentiment: Sentiment::Numb,
            trending_topic: "白金宫的沉默".to_owned(),
        },
        street_view: StreetView {
            description: "中央车站的大屏幕反复播放着同一条官方通告。".to_owned(),
            weather: "阴".to_owned(),
            crowd_mood: "观望".to_owned(),
            visual_details: vec!["官方通告".to_owned(), "巡逻无人机".to_owned()],
            image: None,
        },
        internal_report: InternalReport {
            title: "内部简报".to_owned(),
            content: "局势暂时平稳，但工会内部出现分裂迹象。".to_owned(),
            intelligence_level: IntelligenceLevel::InternalRestricted,
            veracity_score: 70,
        },
    }
}

/// A response carrying the given gauge deltas and [`sample_windows`].
pub fn sample_response(delta_fog: i32, delta_clarity: i32) -> SimulationResponse {
    SimulationResponse {
        narrative_outcome: "联邦度过了平静的一天。".to_owned(),
        visual_changes: "街头的人群略有减少。".to_owned(),
        delta_fog,
        delta_clarity,
        windows: sample_windows(),
        next_scene_context: "内阁成员已在会议室等候。".to_owned(),
        new_clauses: vec![
            "冻结港口自动化采购".to_owned(),
            "发行聚变战争债券".to_owned(),
            "扩大边境巡逻范围".to_owned(),
        ],
        new_quick_replies: vec!["继续观察。".to_owned(), "召集工会领袖。".to_owned()],
    }
}
