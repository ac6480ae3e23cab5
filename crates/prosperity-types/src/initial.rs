//! Fixed content shipped with the game: the opening snapshot and the
//! boot-sequence lore shown before the first turn.

use crate::enums::{Era, IntelligenceLevel, SceneType, Sentiment};
use crate::state::{GameState, InternalReport, Media, StreetView, WarRoom, WindowState};

/// Year the campaign opens in.
pub const STARTING_YEAR: i32 = 2084;

/// Opening social fog.
pub const STARTING_FOG: u8 = 20;

/// Opening social clarity.
pub const STARTING_CLARITY: u8 = 80;

/// 1x1 PNG shown in the street view until the first generated image arrives.
pub const PLACEHOLDER_STREET_IMAGE: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+P+/HgAFhAJ/wlseKgAAAABJRU5ErkJggg==";

/// Boot sequence played during the intro phase, one line at a time.
pub const LORE_INTRO_TEXT: [&str; 15] = [
    "系统自检中... 联邦中央主脑在线。",
    "时间: 2084年",
    "地点: 联邦首都 (Federal Capital)",
    "--------------------------------",
    "这是一个属于巨物与微尘的时代。",
    "全球化已死，气候崩溃，旧世界分崩离析。",
    "唯一的希望是六个月后的【聚变并网】。",
    "如果成功，我们将获得无限能源；如果失败，文明将退回黑暗。",
    "与此同时，数以亿计的无意识机器人正在接管港口、矿井与边境。",
    "人类正在失去工作的权利，但也可能从劳役中解放。",
    "你是这个庞大联邦的最高执政官。",
    "你需要平衡财阀、工会、军队与暴民。",
    "为了人类的存续，还是为了资本的永生？",
    "...",
    "祝你好运，总统阁下。",
];

const OPENING_CONTEXT: &str = "联邦最高执政官阁下，欢迎入主白金宫。目前处于【百年转型】的最关键节点：聚变反应堆组将在六个月后尝试并网；边境难民潮因气候恶化达到峰值；而港口的工人们正在抗议新一批'提坦'级无意识机器人的部署。在这个去全球化的时代，您需要驾驶这艘巨轮穿过风暴。";

const OPENING_CLAUSES: [&str; 6] = [
    "签署《边境自动化防卫法案》",
    "启动战略粮食储备投放",
    "强制征用私营聚变公司算力",
    "镇压港口反机械化暴动",
    "削减联邦养老金以补贴能源网",
    "对特定贸易区实施疫情封锁",
];

const OPENING_QUICK_REPLIES: [&str; 4] = [
    "为了聚变并网，一切代价都是允许的。",
    "优先安抚工会，暂缓机器人部署。",
    "启动三级防疫响应，封锁边境。",
    "无视噪音，维持现状。",
];

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

/// The snapshot every new game starts from.
pub fn initial_game_state() -> GameState {
    GameState {
        turn: 1,
        year: STARTING_YEAR,
        era: Era::CentennialTransition,
        social_fog: STARTING_FOG,
        social_clarity: STARTING_CLARITY,
        current_scene: SceneType::MorningBrief,
        scene_context: OPENING_CONTEXT.to_owned(),
        windows: initial_windows(),
        history: Vec::new(),
        available_clauses: owned(&OPENING_CLAUSES),
        available_quick_replies: owned(&OPENING_QUICK_REPLIES),
    }
}

fn initial_windows() -> WindowState {
    WindowState {
        war_room: WarRoom {
            status: "橙色警戒".to_owned(),
            active_threats: owned(&["极端热浪II级", "南部港口罢工", "境外数据渗透"]),
            resource_allocation: 75,
        },
        media: Media {
            headlines: owned(&[
                "联邦能源部：聚变点火倒计时180天",
                "失业率攀升：机器是否真的能养活人类？",
                "边境隔离墙外的哭声",
            ]),
            sentiment: Sentiment::Numb,
            trending_topic: "最后的人类工作".to_owned(),
        },
        street_view: StreetView {
            description: "联邦首都第一重工区。灰色的天空下，一列列‘提坦’型号人形机器人正整齐划一地搬运着聚变反应堆的重型组件。它们没有面孔，只有统一的工业编码。远处，失业的人群隔着铁丝网冷冷地注视着这些不知疲倦的钢铁替代者。空气中弥漫着臭氧和酸雨的味道。".to_owned(),
            weather: "酸性雾霾".to_owned(),
            crowd_mood: "压抑".to_owned(),
            visual_details: owned(&["无面机器人队列", "铁丝网", "巨型冷却塔"]),
            image: Some(PLACEHOLDER_STREET_IMAGE.to_owned()),
        },
        internal_report: InternalReport {
            title: "联邦安全局早报 #2084-05-12".to_owned(),
            content: "南部边境的‘气候难民’压力已接近临界值。我们的无人机侦测到邻国正在试图通过黑客手段干扰我们的聚变电网频率。建议立即提升网络防御等级，并授权在边境使用非致命性声波武器驱散人群。".to_owned(),
            intelligence_level: IntelligenceLevel::FederalTopSecret,
            veracity_score: 88,
        },
    }
}
