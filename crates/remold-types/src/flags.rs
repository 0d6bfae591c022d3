use remold_signature::access::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    Public,
    Private,
    Protected,
    Static,
    Final,
    Synchronized,
    Volatile,
    Transient,
    Native,
    Interface,
    Abstract,
    Strictfp,
    Default,
    Varargs,
    Synthetic,
}

impl Flag {
    fn bit(self) -> u32 {
        1 << (self as u32)
    }
}

/// Java modifier set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Flags(u32);

impl Flags {
    pub const fn empty() -> Self {
        Flags(0)
    }

    pub fn contains(self, flag: Flag) -> bool {
        self.0 & flag.bit() != 0
    }

    pub fn insert(&mut self, flag: Flag) {
        self.0 |= flag.bit();
    }

    pub fn with(mut self, flag: Flag) -> Self {
        self.insert(flag);
        self
    }

    pub fn remove(&mut self, flag: Flag) {
        self.0 &= !flag.bit();
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    /// Class access flags. Interfaces are implicitly abstract.
    pub fn from_class_access(access: u16) -> Self {
        let mut flags = Self::common(access);
        if access & ACC_INTERFACE != 0 {
            flags.insert(Flag::Interface);
            flags.insert(Flag::Abstract);
        }
        flags
    }

    pub fn from_method_access(access: u16) -> Self {
        let mut flags = Self::common(access);
        for (bit, flag) in [
            (ACC_SYNCHRONIZED, Flag::Synchronized),
            (ACC_VARARGS, Flag::Varargs),
            (ACC_NATIVE, Flag::Native),
            (ACC_STRICT, Flag::Strictfp),
        ] {
            if access & bit != 0 {
                flags.insert(flag);
            }
        }
        flags
    }

    pub fn from_field_access(access: u16) -> Self {
        let mut flags = Self::common(access);
        if access & ACC_VOLATILE != 0 {
            flags.insert(Flag::Volatile);
        }
        if access & ACC_TRANSIENT != 0 {
            flags.insert(Flag::Transient);
        }
        flags
    }

    fn common(access: u16) -> Self {
        let mut flags = Flags::empty();
        for (bit, flag) in [
            (ACC_PUBLIC, Flag::Public),
            (ACC_PRIVATE, Flag::Private),
            (ACC_PROTECTED, Flag::Protected),
            (ACC_STATIC, Flag::Static),
            (ACC_FINAL, Flag::Final),
            (ACC_ABSTRACT, Flag::Abstract),
            (ACC_SYNTHETIC, Flag::Synthetic),
        ] {
            if access & bit != 0 {
                flags.insert(flag);
            }
        }
        flags
    }
}

impl FromIterator<Flag> for Flags {
    fn from_iter<I: IntoIterator<Item = Flag>>(iter: I) -> Self {
        let mut flags = Flags::empty();
        for flag in iter {
            flags.insert(flag);
        }
        flags
    }
}
