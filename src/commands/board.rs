use crate::app::AppState;
use crate::core::features::currency::RateProvider;
use crate::core::features::time_converter::LocaleTimeProvider;
use crate::core::features::{AppFeature, FeatureSync};
use crate::core::theme::FlagStore;
use crate::shared::types::BoardResponse;

fn response(order: &[String]) -> BoardResponse {
    let titles = order
        .iter()
        .map(|id| {
            AppFeature::from_id(id)
                .map(|f| f.title().to_string())
                .unwrap_or_else(|| id.clone())
        })
        .collect();

    BoardResponse {
        order: order.to_vec(),
        titles,
    }
}

pub fn get_board<R, S, T>(state: &AppState<R, S, T>) -> BoardResponse
where
    R: RateProvider,
    S: FlagStore,
    T: LocaleTimeProvider,
{
    response(state.board().items())
}

/// Apply one drag-and-drop and return the resulting order.
pub fn reorder_board<R, S, T>(state: &mut AppState<R, S, T>, active: &str, over: Option<&str>) -> BoardResponse
where
    R: RateProvider,
    S: FlagStore,
    T: LocaleTimeProvider,
{
    response(state.handle_drop(active, over))
}
