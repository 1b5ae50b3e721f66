use leptos::prelude::*;

/// Счётчик запросов компонента: результат публикуется, только если с момента
/// отправки не было более нового запроса.
///
/// ```ignore
/// let ticket = generation.next();
/// spawn_local(async move {
///     let result = rpc::execute_query(sql).await;
///     if generation.is_current(ticket) {
///         set_state.set(result.into());
///     }
/// });
/// ```
#[derive(Clone, Copy)]
pub struct RequestGeneration(StoredValue<u64>);

impl RequestGeneration {
    pub fn new() -> Self {
        Self(StoredValue::new(0))
    }

    /// Start a new request; every older ticket becomes stale
    pub fn next(&self) -> u64 {
        self.0.update_value(|g| *g += 1);
        self.0.get_value()
    }

    pub fn current(&self) -> u64 {
        self.0.try_get_value().unwrap_or_default()
    }

    /// False once a newer request started or the owning component is gone
    pub fn is_current(&self, ticket: u64) -> bool {
        self.0.try_get_value() == Some(ticket)
    }

    /// Drop whatever is in flight
    pub fn invalidate(&self) {
        let _ = self.0.try_update_value(|g| *g += 1);
    }
}

impl Default for RequestGeneration {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn older_tickets_go_stale() {
        let owner = Owner::new();
        owner.set();

        let generation = RequestGeneration::new();
        let first = generation.next();
        assert!(generation.is_current(first));

        let second = generation.next();
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
        assert_eq!(generation.current(), second);

        generation.invalidate();
        assert!(!generation.is_current(second));
        assert_ne!(generation.current(), second);
    }

    #[test]
    fn copies_share_one_counter() {
        let owner = Owner::new();
        owner.set();

        let generation = RequestGeneration::new();
        let in_task = generation;
        let ticket = in_task.next();
        generation.next();
        assert!(!in_task.is_current(ticket));
    }
}
