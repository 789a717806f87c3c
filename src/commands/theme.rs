use crate::app::AppState;
use crate::core::features::currency::RateProvider;
use crate::core::features::time_converter::LocaleTimeProvider;
use crate::core::theme::{FlagStore, Theme};
use crate::shared::error::AppResult;
use crate::shared::types::ThemeResponse;

fn response(theme: Theme) -> ThemeResponse {
    ThemeResponse {
        theme: theme.as_str().to_string(),
        dark: theme == Theme::Dark,
    }
}

pub fn get_theme<R, S, T>(state: &AppState<R, S, T>) -> ThemeResponse
where
    R: RateProvider,
    S: FlagStore,
    T: LocaleTimeProvider,
{
    response(state.theme().theme())
}

/// Flip the theme and persist it.
pub async fn toggle_theme<R, S, T>(state: &mut AppState<R, S, T>) -> AppResult<ThemeResponse>
where
    R: RateProvider,
    S: FlagStore,
    T: LocaleTimeProvider,
{
    let theme = state.theme_mut().toggle().await?;
    Ok(response(theme))
}
