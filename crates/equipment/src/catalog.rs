//! Offline equipment facts used when the summary source is unreachable.

use serde::Serialize;

/// Basic facts about a well-known airframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BasicEquipment {
    pub model: &'static str,
    /// Role, in Traditional Chinese
    pub kind: &'static str,
    pub country: &'static str,
}

const CATALOG: &[BasicEquipment] = &[
    BasicEquipment { model: "J-16", kind: "多用途戰鬥機", country: "中國" },
    BasicEquipment { model: "Su-35S", kind: "多用途戰鬥機", country: "俄羅斯" },
    BasicEquipment { model: "J-20", kind: "第五代隱身戰鬥機", country: "中國" },
    BasicEquipment { model: "F-16", kind: "多用途戰鬥機", country: "美國" },
    BasicEquipment { model: "F-35", kind: "第五代多用途戰鬥機", country: "美國" },
    BasicEquipment { model: "J-10", kind: "輕型多用途戰鬥機", country: "中國" },
    BasicEquipment { model: "Su-30", kind: "雙座多用途戰鬥機", country: "俄羅斯" },
    BasicEquipment { model: "H-6", kind: "戰略轟炸機", country: "中國" },
    BasicEquipment { model: "Y-20", kind: "大型運輸機", country: "中國" },
    BasicEquipment { model: "KJ-500", kind: "預警機", country: "中國" },
];

/// Catalog entry for an exact model name.
pub fn basic_info(model: &str) -> Option<&'static BasicEquipment> {
    CATALOG.iter().find(|entry| entry.model == model)
}

pub fn catalog() -> &'static [BasicEquipment] {
    CATALOG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let j20 = basic_info("J-20").unwrap();
        assert_eq!(j20.kind, "第五代隱身戰鬥機");
        assert_eq!(j20.country, "中國");
        assert!(basic_info("j-20").is_none());
        assert!(basic_info("HQ-12").is_none());
    }

    #[test]
    fn test_models_unique() {
        for (i, entry) in catalog().iter().enumerate() {
            assert!(catalog()[i + 1..].iter().all(|other| other.model != entry.model));
        }
    }
}
