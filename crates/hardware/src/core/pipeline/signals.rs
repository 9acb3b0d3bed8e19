//! Pipeline control signals and operation types.
//!
//! This module defines the signals the decoder produces and the execute stages
//! consume. It performs:
//! 1. **Operation Classification:** `OpType` routes each instruction to exactly one unit.
//! 2. **Operand Selection:** Sources for the ALU inputs (registers, PC, immediate, zero).
//! 3. **Memory Control:** Access kind, width, sign extension and AMO function.
//! 4. **System Control:** CSR access forms, trap returns, fences and WFI.
//! 5. **Fetch Reasons:** Why a fetch was issued, which the squash machine gates on.

/// Functional-unit class of a decoded instruction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OpType {
    /// Integer ALU (also LUI, AUIPC and plain FENCE).
    #[default]
    Alu,
    /// Conditional branch.
    Branch,
    /// JAL / JALR.
    Jump,
    /// Load, store, LR, SC or AMO.
    Mem,
    /// Multiply.
    Mul,
    /// Divide / remainder.
    Div,
    /// CSR access.
    Csr,
    /// MRET, SRET, WFI, FENCE.I, SFENCE.VMA.
    System,
}

/// Integer ALU operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AluOp {
    /// Addition.
    #[default]
    Add,
    /// Subtraction.
    Sub,
    /// Shift left logical.
    Sll,
    /// Set less than (signed).
    Slt,
    /// Set less than unsigned.
    Sltu,
    /// Bitwise XOR.
    Xor,
    /// Shift right logical.
    Srl,
    /// Shift right arithmetic.
    Sra,
    /// Bitwise OR.
    Or,
    /// Bitwise AND.
    And,
}

/// Branch comparator function.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CmpOp {
    /// Equal.
    #[default]
    Eq,
    /// Not equal.
    Ne,
    /// Less than (signed).
    Lt,
    /// Greater or equal (signed).
    Ge,
    /// Less than (unsigned).
    Ltu,
    /// Greater or equal (unsigned).
    Geu,
}

/// Source for ALU operand A.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OpASrc {
    /// Use `rs1` register value.
    #[default]
    Reg1,
    /// Use program counter value.
    Pc,
    /// Use zero.
    Zero,
}

/// Source for ALU operand B.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OpBSrc {
    /// Use sign-extended immediate value.
    #[default]
    Imm,
    /// Use `rs2` register value.
    Reg2,
    /// Use zero.
    Zero,
}

/// Multiplier function.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MulOp {
    /// Low bits of the product.
    #[default]
    Mul,
    /// High bits, signed × signed.
    Mulh,
    /// High bits, signed × unsigned.
    Mulhsu,
    /// High bits, unsigned × unsigned.
    Mulhu,
}

/// Divider function.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DivOp {
    /// Signed quotient.
    #[default]
    Div,
    /// Unsigned quotient.
    Divu,
    /// Signed remainder.
    Rem,
    /// Unsigned remainder.
    Remu,
}

/// Kind of data-memory access.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MemKind {
    /// Plain load.
    #[default]
    Load,
    /// Plain store.
    Store,
    /// Load-reserved.
    LoadReserved,
    /// Store-conditional; the response value is 0 on success.
    StoreConditional,
    /// Read-modify-write atomic; the response value is the old memory value.
    Amo,
}

impl MemKind {
    /// Returns `true` for accesses that write memory (faults are store faults).
    pub const fn is_write(self) -> bool {
        !matches!(self, Self::Load | Self::LoadReserved)
    }
}

/// Memory access width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MemWidth {
    /// 8-bit byte access.
    Byte,
    /// 16-bit half-word access.
    Half,
    /// 32-bit word access.
    Word,
    /// 64-bit double-word access.
    #[default]
    Double,
}

impl MemWidth {
    /// Returns the access size in bytes.
    pub const fn bytes(self) -> u64 {
        match self {
            Self::Byte => 1,
            Self::Half => 2,
            Self::Word => 4,
            Self::Double => 8,
        }
    }
}

/// Atomic memory operation function (A extension).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AmoOp {
    /// Swap.
    #[default]
    Swap,
    /// Add.
    Add,
    /// XOR.
    Xor,
    /// AND.
    And,
    /// OR.
    Or,
    /// Signed minimum.
    Min,
    /// Signed maximum.
    Max,
    /// Unsigned minimum.
    Minu,
    /// Unsigned maximum.
    Maxu,
}

/// Memory-access control for `OpType::Mem` instructions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemOp {
    /// Access kind.
    pub kind: MemKind,
    /// Access width.
    pub width: MemWidth,
    /// Sign-extend the loaded value.
    pub signed: bool,
    /// AMO function (only meaningful for `MemKind::Amo`).
    pub amo: AmoOp,
}

/// CSR (Control and Status Register) operation type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CsrOp {
    /// No CSR operation.
    #[default]
    None,
    /// CSR read-write (`CSRRW`).
    Rw,
    /// CSR read-set (`CSRRS`).
    Rs,
    /// CSR read-clear (`CSRRC`).
    Rc,
    /// CSR read-write immediate (`CSRRWI`).
    Rwi,
    /// CSR read-set immediate (`CSRRSI`).
    Rsi,
    /// CSR read-clear immediate (`CSRRCI`).
    Rci,
}

impl CsrOp {
    /// Returns `true` for the immediate (`uimm`) forms.
    pub const fn is_immediate(self) -> bool {
        matches!(self, Self::Rwi | Self::Rsi | Self::Rci)
    }

    /// Returns `true` when the instruction writes the CSR.
    ///
    /// Set and clear forms with a zero source (`rs1 = x0` or `uimm = 0`) only read.
    pub const fn writes(self, source_field: usize) -> bool {
        match self {
            Self::None => false,
            Self::Rw | Self::Rwi => true,
            Self::Rs | Self::Rc | Self::Rsi | Self::Rci => source_field != 0,
        }
    }

    /// Computes the value written to the CSR.
    ///
    /// # Arguments
    ///
    /// * `old` - Current CSR value.
    /// * `operand` - Register value or zero-extended `uimm`.
    pub const fn apply(self, old: u64, operand: u64) -> u64 {
        match self {
            Self::None => old,
            Self::Rw | Self::Rwi => operand,
            Self::Rs | Self::Rsi => old | operand,
            Self::Rc | Self::Rci => old & !operand,
        }
    }
}

/// System operation carried by `OpType::System`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SysOp {
    /// Not a system operation.
    #[default]
    None,
    /// Machine-mode trap return.
    Mret,
    /// Supervisor-mode trap return.
    Sret,
    /// Wait for interrupt.
    Wfi,
    /// Instruction-stream fence.
    FenceI,
    /// Address-translation fence.
    SfenceVma,
}

/// Why a fetch request was issued.
///
/// Every record in the pipeline carries the reason of the fetch that produced
/// it, which is how the squash state machine tells the first instruction of a
/// redirected stream apart from stale wrong-path instructions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FetchReason {
    /// Sequential advance.
    #[default]
    Prefetch,
    /// Target of a predicted-taken branch or jump.
    Predict,
    /// Correction after a misprediction; also the reset fetch.
    Mispredict,
    /// Refetch after `FENCE.I`.
    FenceI,
    /// Refetch after a translation change (`satp` write, `SFENCE.VMA`).
    SatpChanged,
    /// Refetch after a privilege/protection change (status write, `xRET`).
    ProtChanged,
    /// Trap vector.
    Exception,
}

impl FetchReason {
    /// All reasons, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Prefetch,
        Self::Predict,
        Self::Mispredict,
        Self::FenceI,
        Self::SatpChanged,
        Self::ProtChanged,
        Self::Exception,
    ];

    /// Returns `true` for architectural redirects (anything but sequential
    /// advance and prediction).
    pub const fn is_redirect(self) -> bool {
        !matches!(self, Self::Prefetch | Self::Predict)
    }

    /// Short label used in trace output and statistics.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Prefetch => "prefetch",
            Self::Predict => "predict",
            Self::Mispredict => "mispredict",
            Self::FenceI => "fence.i",
            Self::SatpChanged => "satp",
            Self::ProtChanged => "prot",
            Self::Exception => "exception",
        }
    }
}
