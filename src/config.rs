use anyhow::{bail, Context, Result};
use std::{env, str::FromStr, time::Duration};

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub field_width: u16,
    pub field_height: u16,
    pub initial_length: usize,
    pub initial_delay: Duration,
    /// Taken off the frame delay for every apple eaten.
    pub delay_step: Duration,
    pub min_delay: Duration,
    /// Fixed RNG seed for reproducible apple placement.
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            field_width: 40,
            field_height: 20,
            initial_length: 3,
            initial_delay: Duration::from_millis(150),
            delay_step: Duration::from_millis(5),
            min_delay: Duration::from_millis(50),
            seed: None,
        }
    }
}

impl Settings {
    /// Defaults, overridden by `SNAKE_WIDTH`, `SNAKE_HEIGHT`, `SNAKE_LENGTH`,
    /// `SNAKE_DELAY_MS` and `SNAKE_SEED` when set.
    pub fn from_env() -> Result<Self> {
        let mut settings = Settings::default();

        if let Some(w) = env_var("SNAKE_WIDTH")? {
            settings.field_width = w;
        }
        if let Some(h) = env_var("SNAKE_HEIGHT")? {
            settings.field_height = h;
        }
        if let Some(len) = env_var("SNAKE_LENGTH")? {
            settings.initial_length = len;
        }
        if let Some(ms) = env_var("SNAKE_DELAY_MS")? {
            settings.initial_delay = Duration::from_millis(ms);
            settings.min_delay = settings.min_delay.min(settings.initial_delay);
        }
        settings.seed = env_var("SNAKE_SEED")?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.field_width == 0 || self.field_height == 0 {
            bail!("field must be at least 1x1, got {}x{}", self.field_width, self.field_height);
        }
        if self.initial_length == 0 || self.initial_length > self.field_width as usize {
            bail!(
                "initial length {} does not fit a field {} cells wide",
                self.initial_length,
                self.field_width
            );
        }
        if self.initial_length >= self.field_width as usize * self.field_height as usize {
            bail!("initial length {} leaves no free cell for an apple", self.initial_length);
        }
        if self.min_delay.is_zero() || self.min_delay > self.initial_delay {
            bail!(
                "minimum delay {:?} must be positive and no larger than the starting delay {:?}",
                self.min_delay,
                self.initial_delay
            );
        }
        Ok(())
    }
}

fn env_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("invalid value {:?} for {}", raw, name)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(e).with_context(|| format!("could not read {}", name)),
    }
}
