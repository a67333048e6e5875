use serde::{Deserialize, Serialize};

/// Назначение LLM агента
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentPurpose {
    /// Генерация названий товаров
    Title,
    /// Генерация описаний товаров
    Description,
    /// Анализ изображений товара (vision)
    ImageAnalysis,
    /// Без специализации
    General,
}

impl AgentPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentPurpose::Title => "title",
            AgentPurpose::Description => "description",
            AgentPurpose::ImageAnalysis => "image_analysis",
            AgentPurpose::General => "general",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "title" => Ok(AgentPurpose::Title),
            "description" => Ok(AgentPurpose::Description),
            "image_analysis" => Ok(AgentPurpose::ImageAnalysis),
            "general" => Ok(AgentPurpose::General),
            _ => Err(format!("Unknown agent purpose: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_matches_as_str() {
        let json = serde_json::to_string(&AgentPurpose::ImageAnalysis).unwrap();
        assert_eq!(json, "\"image_analysis\"");
        assert_eq!(
            AgentPurpose::from_str(AgentPurpose::Title.as_str()),
            Ok(AgentPurpose::Title)
        );
        assert!(AgentPurpose::from_str("summary").is_err());
    }
}
