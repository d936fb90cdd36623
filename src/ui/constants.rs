// ui/constants.rs

pub const MIN_WIDTH: u16 = 80;
pub const MIN_HEIGHT: u16 = 24;

pub const TITLE: &str = r#" ____       _            _   _
|  _ \  ___| |_ ___  ___| |_(_)_   _____
| | | |/ _ \ __/ _ \/ __| __| \ \ / / _ \
| |_| |  __/ ||  __/ (__| |_| |\ V /  __/
|____/ \___|\__\___|\___|\__|_| \_/ \___|
"#;

pub const INTERROGATION_KEYS: &str =
    "Enter submit · Tab question/accuse/voice · Ctrl-S suspect · Ctrl-D difficulty · Ctrl-N new case · PgUp/PgDn scroll · Esc menu";

pub const MYSTERY_KEYS: &str =
    "Ctrl-G new mystery · Ctrl-S suspect · Tab question/accuse · Enter submit · Esc menu";
