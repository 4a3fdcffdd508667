// ============================================
// Streaming Stats - Снимок состояния очередей
// ============================================

use serde::Serialize;

/// Снимок очередей стриминга
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StreamingStats {
    /// Ожидают генерации
    pub pending: usize,
    /// Генерируются прямо сейчас
    pub in_flight: usize,
    /// Сгенерированы, ждут `process_chunks`
    pub ready: usize,
    /// Загружены в окно
    pub loaded: usize,
    /// Номер эпохи сида
    pub epoch: u64,
}

impl StreamingStats {
    /// Рабочим потокам нечего делать
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.pending == 0 && self.in_flight == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle() {
        let stats = StreamingStats { ready: 3, loaded: 10, ..Default::default() };
        assert!(stats.is_idle());
        assert!(!StreamingStats { in_flight: 1, ..stats }.is_idle());
    }

    #[test]
    fn test_serializes_for_logging() {
        let stats = StreamingStats { pending: 1, in_flight: 2, ready: 3, loaded: 4, epoch: 5 };
        let json = serde_json::to_string(&stats).unwrap();
        assert_eq!(json, r#"{"pending":1,"in_flight":2,"ready":3,"loaded":4,"epoch":5}"#);
    }
}
