//! Directive keywords, placeholder tokens and fixed file names.

// Container directives.
pub(crate) const KEYWORD_MARKER: &str = "lil";
pub(crate) const SHADER_DECLARATION: &str = "Shader";
pub(crate) const SKIP_SETTINGS: &str = "lilSkipSettings";
pub(crate) const PROPERTIES: &str = "lilProperties";
pub(crate) const SUBSHADER: &str = "lilSubShader";
pub(crate) const SUBSHADER_INSERT_POST: &str = "lilSubShaderInsertPost";
pub(crate) const SUBSHADER_INSERT: &str = "lilSubShaderInsert";
pub(crate) const SUBSHADER_TAGS: &str = "lilSubShaderTags";
pub(crate) const PASS_SHADER_NAME: &str = "lilPassShaderName";
pub(crate) const COMMENT: &str = "//";

// Block references.
pub(crate) const DEFAULT_MARKER: &str = "Default";
pub(crate) const BLOCK_EXTENSION: &str = ".lilblock";
pub(crate) const USE_PASS_MARKER: &str = "UsePass";
pub(crate) const PROPERTIES_FOLDER: &str = "Properties";

/// File name of the overlay document, looked up next to the container.
pub const OVERLAY_FILE_NAME: &str = "lilCustomShaderDatas.lilblock";

// Overlay tags.
pub(crate) const TAG_SHADER_NAME: &str = "ShaderName";
pub(crate) const TAG_EDITOR_NAME: &str = "EditorName";
pub(crate) const TAG_REPLACE: &str = "Replace";
pub(crate) const TAG_INSERT: &str = "Insert";
pub(crate) const TAG_INSERT_PASS_PRE: &str = "InsertPassPre";
pub(crate) const TAG_INSERT_PASS_POST: &str = "InsertPassPost";
pub(crate) const TAG_INSERT_USEPASS_PRE: &str = "InsertUsePassPre";
pub(crate) const TAG_INSERT_USEPASS_POST: &str = "InsertUsePassPost";
pub(crate) const NEGATION: char = '!';

// Placeholders.
pub(crate) const SHADER_NAME: &str = "*LIL_SHADER_NAME*";
pub(crate) const EDITOR_NAME: &str = "*LIL_EDITOR_NAME*";
pub(crate) const SUBSHADER_INSERT_TOKEN: &str = "*LIL_SUBSHADER_INSERT*";
pub(crate) const SUBSHADER_INSERT_POST_TOKEN: &str = "*LIL_SUBSHADER_INSERT_POST*";
pub(crate) const SHADER_SETTING: &str = "*LIL_SHADER_SETTING*";
pub(crate) const PASS_SHADER_NAME_TOKEN: &str = "*LIL_PASS_SHADER_NAME*";
pub(crate) const SUBSHADER_TAGS_TOKEN: &str = "*LIL_SUBSHADER_TAGS*";
pub(crate) const DOTS_SM_TAGS: &str = "*LIL_DOTS_SM_TAGS*";
pub(crate) const DOTS_SM_4_5: &str = "*LIL_DOTS_SM_4_5*";
pub(crate) const DOTS_SM_4_5_OR_3_5: &str = "*LIL_DOTS_SM_4_5_OR_3_5*";
pub(crate) const INSERT_PASS_PRE: &str = "*LIL_INSERT_PASS_PRE*";
pub(crate) const INSERT_PASS_POST: &str = "*LIL_INSERT_PASS_POST*";
pub(crate) const INSERT_USEPASS_PRE: &str = "*LIL_INSERT_USEPASS_PRE*";
pub(crate) const INSERT_USEPASS_POST: &str = "*LIL_INSERT_USEPASS_POST*";
pub(crate) const LIGHTMODE_FORWARD_0: &str = "*LIL_LIGHTMODE_FORWARD_0*";
pub(crate) const LIGHTMODE_FORWARD_1: &str = "*LIL_LIGHTMODE_FORWARD_1*";
pub(crate) const LIGHTMODE_FORWARD_2: &str = "*LIL_LIGHTMODE_FORWARD_2*";

/// Text prefix rewritten to the configured shader library folder.
pub(crate) const INCLUDES_PREFIX: &str = "\"Includes";
pub(crate) const INCLUDE_DIRECTIVE: &str = "#include \"";
pub(crate) const INCLUDE_ROOTS: [&str; 2] = ["\"Assets/", "\"Packages/"];
