//! Decoding of OpenGL debug-output messages and call stack dumps.
//!
//! The enum values are the raw `GL_DEBUG_*` constants so the decoding works
//! without any GL binding in scope.

use std::backtrace::Backtrace;
use std::fmt;

const GL_DEBUG_SOURCE_API: u32 = 0x8246;
const GL_DEBUG_SOURCE_WINDOW_SYSTEM: u32 = 0x8247;
const GL_DEBUG_SOURCE_SHADER_COMPILER: u32 = 0x8248;
const GL_DEBUG_SOURCE_THIRD_PARTY: u32 = 0x8249;
const GL_DEBUG_SOURCE_APPLICATION: u32 = 0x824A;
const GL_DEBUG_SOURCE_OTHER: u32 = 0x824B;

const GL_DEBUG_TYPE_ERROR: u32 = 0x824C;
const GL_DEBUG_TYPE_DEPRECATED_BEHAVIOR: u32 = 0x824D;
const GL_DEBUG_TYPE_UNDEFINED_BEHAVIOR: u32 = 0x824E;
const GL_DEBUG_TYPE_PORTABILITY: u32 = 0x824F;
const GL_DEBUG_TYPE_PERFORMANCE: u32 = 0x8250;
const GL_DEBUG_TYPE_OTHER: u32 = 0x8251;

const GL_DEBUG_SEVERITY_HIGH: u32 = 0x9146;
const GL_DEBUG_SEVERITY_MEDIUM: u32 = 0x9147;
const GL_DEBUG_SEVERITY_LOW: u32 = 0x9148;
const GL_DEBUG_SEVERITY_NOTIFICATION: u32 = 0x826B;

const BANNER_TOP: &str = "---------------------Stack Trace---------------------";
const BANNER_BOTTOM: &str = "-----------------------------------------------------";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DebugSource {
    Api,
    WindowSystem,
    ShaderCompiler,
    ThirdParty,
    Application,
    Other,
    Unknown(u32),
}

impl DebugSource {
    pub fn from_gl(value: u32) -> Self {
        match value {
            GL_DEBUG_SOURCE_API => DebugSource::Api,
            GL_DEBUG_SOURCE_WINDOW_SYSTEM => DebugSource::WindowSystem,
            GL_DEBUG_SOURCE_SHADER_COMPILER => DebugSource::ShaderCompiler,
            GL_DEBUG_SOURCE_THIRD_PARTY => DebugSource::ThirdParty,
            GL_DEBUG_SOURCE_APPLICATION => DebugSource::Application,
            GL_DEBUG_SOURCE_OTHER => DebugSource::Other,
            other => DebugSource::Unknown(other),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DebugSource::Api => "API",
            DebugSource::WindowSystem => "Window System",
            DebugSource::ShaderCompiler => "Shader Compiler",
            DebugSource::ThirdParty => "Third Party",
            DebugSource::Application => "Application",
            DebugSource::Other => "Other",
            DebugSource::Unknown(_) => "",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DebugType {
    Error,
    DeprecatedBehavior,
    UndefinedBehavior,
    Portability,
    Performance,
    Other,
    Unknown(u32),
}

impl DebugType {
    pub fn from_gl(value: u32) -> Self {
        match value {
            GL_DEBUG_TYPE_ERROR => DebugType::Error,
            GL_DEBUG_TYPE_DEPRECATED_BEHAVIOR => DebugType::DeprecatedBehavior,
            GL_DEBUG_TYPE_UNDEFINED_BEHAVIOR => DebugType::UndefinedBehavior,
            GL_DEBUG_TYPE_PORTABILITY => DebugType::Portability,
            GL_DEBUG_TYPE_PERFORMANCE => DebugType::Performance,
            GL_DEBUG_TYPE_OTHER => DebugType::Other,
            other => DebugType::Unknown(other),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DebugType::Error => "Error",
            DebugType::DeprecatedBehavior => "Deprecated Behaviour",
            DebugType::UndefinedBehavior => "Undefined Behaviour",
            DebugType::Portability => "Portability Issue",
            DebugType::Performance => "Performance Issue",
            DebugType::Other => "Other",
            DebugType::Unknown(_) => "",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DebugSeverity {
    High,
    Medium,
    Low,
    Notification,
    Unknown(u32),
}

impl DebugSeverity {
    pub fn from_gl(value: u32) -> Self {
        match value {
            GL_DEBUG_SEVERITY_HIGH => DebugSeverity::High,
            GL_DEBUG_SEVERITY_MEDIUM => DebugSeverity::Medium,
            GL_DEBUG_SEVERITY_LOW => DebugSeverity::Low,
            GL_DEBUG_SEVERITY_NOTIFICATION => DebugSeverity::Notification,
            other => DebugSeverity::Unknown(other),
        }
    }

    /// Notifications have no label of their own, same as unknown values.
    pub fn label(self) -> &'static str {
        match self {
            DebugSeverity::High => "High",
            DebugSeverity::Medium => "Medium",
            DebugSeverity::Low => "Low",
            DebugSeverity::Notification | DebugSeverity::Unknown(_) => "",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DebugMessage {
    pub source: DebugSource,
    pub ty: DebugType,
    pub id: u32,
    pub severity: DebugSeverity,
    pub message: String,
}

impl DebugMessage {
    pub fn from_gl(source: u32, ty: u32, id: u32, severity: u32, message: &str) -> Self {
        Self {
            source: DebugSource::from_gl(source),
            ty: DebugType::from_gl(ty),
            id,
            severity: DebugSeverity::from_gl(severity),
            message: message.to_owned(),
        }
    }

    pub fn header(&self) -> String {
        format!(
            "[Type] : {}[Source] : {}[ID] : {}[Serverity] : {}",
            self.ty.label(),
            self.source.label(),
            self.id,
            self.severity.label()
        )
    }
}

impl fmt::Display for DebugMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header())?;
        write!(f, "[Message] : {}", self.message)
    }
}

/// Entry point for GL debug callbacks: logs the decoded message, then the call stack.
pub fn log_debug_message(source: u32, ty: u32, id: u32, severity: u32, message: &str) {
    let message = DebugMessage::from_gl(source, ty, id, severity, message);
    log::error!("{}", message.header());
    log::error!("[Message] : {}", message.message);
    StackTrace::print();
}

pub struct StackTrace {
    backtrace: Backtrace,
}

impl StackTrace {
    pub fn capture() -> Self {
        Self {
            backtrace: Backtrace::force_capture(),
        }
    }

    /// Capture the current call stack and write it to the error log.
    pub fn print() {
        for line in Self::capture().to_string().lines() {
            log::error!("{}", line);
        }
    }
}

impl fmt::Display for StackTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", BANNER_TOP)?;
        writeln!(f, "{}", self.backtrace)?;
        write!(f, "{}", BANNER_BOTTOM)
    }
}
