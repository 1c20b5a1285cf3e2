use serde::{Deserialize, Serialize};

/// MediaPipe Hands の 21 ランドマークインデックス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum HandLandmarkIndex {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexMcp = 5,
    IndexPip = 6,
    IndexDip = 7,
    IndexTip = 8,
    MiddleMcp = 9,
    MiddlePip = 10,
    MiddleDip = 11,
    MiddleTip = 12,
    RingMcp = 13,
    RingPip = 14,
    RingDip = 15,
    RingTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

impl HandLandmarkIndex {
    pub const COUNT: usize = 21;

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Wrist),
            1 => Some(Self::ThumbCmc),
            2 => Some(Self::ThumbMcp),
            3 => Some(Self::ThumbIp),
            4 => Some(Self::ThumbTip),
            5 => Some(Self::IndexMcp),
            6 => Some(Self::IndexPip),
            7 => Some(Self::IndexDip),
            8 => Some(Self::IndexTip),
            9 => Some(Self::MiddleMcp),
            10 => Some(Self::MiddlePip),
            11 => Some(Self::MiddleDip),
            12 => Some(Self::MiddleTip),
            13 => Some(Self::RingMcp),
            14 => Some(Self::RingPip),
            15 => Some(Self::RingDip),
            16 => Some(Self::RingTip),
            17 => Some(Self::PinkyMcp),
            18 => Some(Self::PinkyPip),
            19 => Some(Self::PinkyDip),
            20 => Some(Self::PinkyTip),
            _ => None,
        }
    }
}

/// 単一ランドマーク
/// x/y は正規化座標 (0.0〜1.0)、z はカメラ相対の深度（手首基準、単位なし）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub fn new_3d(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// 座標が有限値か
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// 2点間のユークリッド距離（xy平面）
    pub fn distance(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Default for Landmark {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }
}

/// 外部分類器のカテゴリスコア (名前, 信頼度 0.0〜1.0)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub name: String,
    pub score: f32,
}

impl CategoryScore {
    pub fn new(name: impl Into<String>, score: f32) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// 片手分の検出結果: 21ランドマーク + 分類器スコア
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandFrame {
    pub landmarks: [Landmark; HandLandmarkIndex::COUNT],
    #[serde(default)]
    pub categories: Vec<CategoryScore>,
}

impl HandFrame {
    pub fn new(landmarks: [Landmark; HandLandmarkIndex::COUNT]) -> Self {
        Self {
            landmarks,
            categories: Vec::new(),
        }
    }

    /// 可変長の列から構築。21点未満なら None（不完全な手は破棄）
    pub fn from_slice(landmarks: &[Landmark], categories: Vec<CategoryScore>) -> Option<Self> {
        if landmarks.len() < HandLandmarkIndex::COUNT {
            return None;
        }
        let mut fixed = [Landmark::default(); HandLandmarkIndex::COUNT];
        fixed.copy_from_slice(&landmarks[..HandLandmarkIndex::COUNT]);
        Some(Self {
            landmarks: fixed,
            categories,
        })
    }

    pub fn get(&self, index: HandLandmarkIndex) -> &Landmark {
        &self.landmarks[index as usize]
    }

    /// カテゴリ名の集合に一致する最初のスコア。該当なしは None
    /// （スコア0とカテゴリ不在を区別する）
    pub fn score_for(&self, names: &[&str]) -> Option<f32> {
        self.categories
            .iter()
            .find(|c| names.contains(&c.name.as_str()))
            .map(|c| c.score)
    }
}

/// 顔ランドマーク（468点以上、疎アクセス）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FaceFrame {
    pub landmarks: Vec<Landmark>,
}

impl FaceFrame {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }

    /// インデックスで取得。範囲外は None（欠損は呼び出し側でfalseに縮退）
    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.landmarks.get(index)
    }
}

/// ビジョンモデルが1フレームごとに返す検出結果
/// hand/face の None は「検出なし」であり、スコア0とは別物
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Frame {
    pub timestamp_ms: f64,
    pub hand: Option<HandFrame>,
    pub face: Option<FaceFrame>,
}

impl Frame {
    pub fn empty(timestamp_ms: f64) -> Self {
        Self {
            timestamp_ms,
            hand: None,
            face: None,
        }
    }
}
