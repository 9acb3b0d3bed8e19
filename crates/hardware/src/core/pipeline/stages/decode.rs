//! Instruction Decode (ID) Stage.
//!
//! This module implements the decoder collaborator and the decode → execute-1
//! handoff. It performs the following:
//! 1. **Decoding:** Converts raw instruction bits into control signals (RV64IMA, Zicsr,
//!    Zifencei, the privileged instructions and, when enabled, the C extension).
//! 2. **Legality:** Privilege and status checks (`TSR`, `TW`, `TVM`, CSR access rights)
//!    that turn an instruction into an illegal-instruction exception.
//! 3. **Register Read:** Source operands are read when the handoff fires.
//!
//! Decoding is pure: the same bits and context always produce the same record.

use tracing::trace;

use crate::common::RegisterFile;
use crate::common::error::Trap;
use crate::core::arch::csr;
use crate::core::arch::mode::PrivilegeMode;
use crate::core::pipeline::latches::{DecodedInstruction, FetchedInstruction, Latch, transfer};
use crate::core::pipeline::signals::{
    AluOp, AmoOp, CmpOp, CsrOp, DivOp, MemKind, MemOp, MemWidth, MulOp, OpASrc, OpBSrc, OpType,
    SysOp,
};
use crate::isa::decode::{b_imm, i_imm, j_imm, s_imm, u_imm};
use crate::isa::instruction::InstructionBits;
use crate::isa::opcodes::{alu, amo, branch, fence, funct7, major, mem, muldiv};
use crate::isa::privileged::opcodes as sys_ops;
use crate::isa::rvc;

/// Mask for the 6-bit RV64 shift amount of `SLLI`/`SRLI`/`SRAI`.
const SHAMT64_MASK: u32 = 0x3F;
/// Mask for the 5-bit shift amount of the word shifts.
const SHAMT32_MASK: u32 = 0x1F;
/// `imm[11:6]` of `SRAI`.
const SRAI_FUNCT6: u32 = 0b01_0000;

/// Privilege and status inputs the decoder checks against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodeContext {
    /// Current privilege mode.
    pub privilege: PrivilegeMode,
    /// `mstatus.TSR`: `SRET` is illegal in S-mode.
    pub tsr: bool,
    /// `mstatus.TW`: `WFI` is illegal below M-mode.
    pub tw: bool,
    /// `mstatus.TVM`: `satp` accesses and `SFENCE.VMA` are illegal in S-mode.
    pub tvm: bool,
    /// Compressed instructions are legal.
    pub compressed: bool,
}

/// Translates a fetched instruction into a decoded record.
///
/// Implementations must be pure. Illegality and fetch faults are reported
/// through `DecodedInstruction::exception`, never as an error.
pub trait Decoder: std::fmt::Debug {
    /// Decodes one instruction.
    fn decode(&self, fetched: &FetchedInstruction, ctx: &DecodeContext) -> DecodedInstruction;
}

/// Reference RV64IMAC + Zicsr + Zifencei + privileged decoder.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardDecoder;

impl Decoder for StandardDecoder {
    fn decode(&self, fetched: &FetchedInstruction, ctx: &DecodeContext) -> DecodedInstruction {
        let size = fetched.size();
        let raw = if size == 2 {
            fetched.word & 0xFFFF
        } else {
            fetched.word
        };
        let mut d = DecodedInstruction {
            pc: fetched.pc,
            word: raw,
            size,
            reason: fetched.reason,
            prediction: fetched.prediction,
            ..Default::default()
        };

        if let Some(trap) = fetched.exception {
            d.exception = Some(trap);
            return d;
        }

        let inst = if size == 2 {
            if !ctx.compressed {
                d.exception = Some(Trap::IllegalInstruction(raw));
                return d;
            }
            match rvc::expand(raw as u16) {
                0 => {
                    d.exception = Some(Trap::IllegalInstruction(raw));
                    return d;
                }
                expanded => expanded,
            }
        } else {
            raw
        };

        if let Err(trap) = decode_fields(inst, raw, ctx, &mut d) {
            d.exception = Some(trap);
        }
        d
    }
}

/// Fills the control fields of `d` from a 32-bit encoding.
///
/// # Arguments
///
/// * `inst` - The 32-bit encoding (expanded for compressed instructions).
/// * `raw` - The original bits, reported as `tval` when illegal.
/// * `ctx` - Privilege and status inputs.
/// * `d` - Record to fill; `pc`, `size` and the pass-through fields are already set.
fn decode_fields(
    inst: u32,
    raw: u32,
    ctx: &DecodeContext,
    d: &mut DecodedInstruction,
) -> Result<(), Trap> {
    let illegal = Trap::IllegalInstruction(raw);
    let rd = inst.rd();
    let rs1 = inst.rs1();
    let rs2 = inst.rs2();
    let f3 = inst.funct3();
    let f7 = inst.funct7();

    match inst.opcode() {
        major::LUI => {
            alu_op(d, AluOp::Add, OpASrc::Zero, OpBSrc::Imm);
            d.rd = rd;
            d.imm = u_imm(inst);
        }
        major::AUIPC => {
            alu_op(d, AluOp::Add, OpASrc::Pc, OpBSrc::Imm);
            d.rd = rd;
            d.imm = u_imm(inst);
        }
        major::JAL => {
            d.op_type = OpType::Jump;
            d.rd = rd;
            d.imm = j_imm(inst);
        }
        major::JALR => {
            if f3 != 0 {
                return Err(illegal);
            }
            d.op_type = OpType::Jump;
            d.rd = rd;
            read_rs1(d, rs1);
            d.imm = i_imm(inst);
        }
        major::BRANCH => {
            d.cmp_op = match f3 {
                branch::BEQ => CmpOp::Eq,
                branch::BNE => CmpOp::Ne,
                branch::BLT => CmpOp::Lt,
                branch::BGE => CmpOp::Ge,
                branch::BLTU => CmpOp::Ltu,
                branch::BGEU => CmpOp::Geu,
                _ => return Err(illegal),
            };
            d.op_type = OpType::Branch;
            read_rs1(d, rs1);
            read_rs2(d, rs2);
            d.imm = b_imm(inst);
        }
        major::LOAD => {
            let (width, signed) = match f3 {
                mem::B => (MemWidth::Byte, true),
                mem::H => (MemWidth::Half, true),
                mem::W => (MemWidth::Word, true),
                mem::D => (MemWidth::Double, true),
                mem::BU => (MemWidth::Byte, false),
                mem::HU => (MemWidth::Half, false),
                mem::WU => (MemWidth::Word, false),
                _ => return Err(illegal),
            };
            d.op_type = OpType::Mem;
            d.mem = MemOp {
                kind: MemKind::Load,
                width,
                signed,
                amo: AmoOp::default(),
            };
            d.rd = rd;
            read_rs1(d, rs1);
            d.imm = i_imm(inst);
        }
        major::STORE => {
            let width = match f3 {
                mem::B => MemWidth::Byte,
                mem::H => MemWidth::Half,
                mem::W => MemWidth::Word,
                mem::D => MemWidth::Double,
                _ => return Err(illegal),
            };
            d.op_type = OpType::Mem;
            d.mem = MemOp {
                kind: MemKind::Store,
                width,
                signed: false,
                amo: AmoOp::default(),
            };
            read_rs1(d, rs1);
            read_rs2(d, rs2);
            d.imm = s_imm(inst);
        }
        major::OP_IMM => {
            let op = match f3 {
                alu::ADD_SUB => AluOp::Add,
                alu::SLT => AluOp::Slt,
                alu::SLTU => AluOp::Sltu,
                alu::XOR => AluOp::Xor,
                alu::OR => AluOp::Or,
                alu::AND => AluOp::And,
                alu::SLL if inst >> 26 == 0 => AluOp::Sll,
                alu::SRL_SRA if inst >> 26 == 0 => AluOp::Srl,
                alu::SRL_SRA if inst >> 26 == SRAI_FUNCT6 => AluOp::Sra,
                _ => return Err(illegal),
            };
            alu_op(d, op, OpASrc::Reg1, OpBSrc::Imm);
            d.rd = rd;
            read_rs1(d, rs1);
            d.imm = if matches!(op, AluOp::Sll | AluOp::Srl | AluOp::Sra) {
                ((inst >> 20) & SHAMT64_MASK) as i64
            } else {
                i_imm(inst)
            };
        }
        major::OP_IMM_32 => {
            let op = match (f3, f7) {
                (alu::ADD_SUB, _) => AluOp::Add,
                (alu::SLL, funct7::DEFAULT) => AluOp::Sll,
                (alu::SRL_SRA, funct7::DEFAULT) => AluOp::Srl,
                (alu::SRL_SRA, funct7::ALT) => AluOp::Sra,
                _ => return Err(illegal),
            };
            alu_op(d, op, OpASrc::Reg1, OpBSrc::Imm);
            d.is32 = true;
            d.rd = rd;
            read_rs1(d, rs1);
            d.imm = if op == AluOp::Add {
                i_imm(inst)
            } else {
                ((inst >> 20) & SHAMT32_MASK) as i64
            };
        }
        major::OP | major::OP_32 => {
            let word = inst.opcode() == major::OP_32;
            if f7 == funct7::MULDIV {
                decode_muldiv(d, f3, word).ok_or(illegal)?;
            } else {
                let op = match (f3, f7, word) {
                    (alu::ADD_SUB, funct7::DEFAULT, _) => AluOp::Add,
                    (alu::ADD_SUB, funct7::ALT, _) => AluOp::Sub,
                    (alu::SLL, funct7::DEFAULT, _) => AluOp::Sll,
                    (alu::SRL_SRA, funct7::DEFAULT, _) => AluOp::Srl,
                    (alu::SRL_SRA, funct7::ALT, _) => AluOp::Sra,
                    (alu::SLT, funct7::DEFAULT, false) => AluOp::Slt,
                    (alu::SLTU, funct7::DEFAULT, false) => AluOp::Sltu,
                    (alu::XOR, funct7::DEFAULT, false) => AluOp::Xor,
                    (alu::OR, funct7::DEFAULT, false) => AluOp::Or,
                    (alu::AND, funct7::DEFAULT, false) => AluOp::And,
                    _ => return Err(illegal),
                };
                alu_op(d, op, OpASrc::Reg1, OpBSrc::Reg2);
            }
            d.is32 = word;
            d.rd = rd;
            read_rs1(d, rs1);
            read_rs2(d, rs2);
        }
        major::MISC_MEM => match f3 {
            // Accesses are performed in order, so FENCE has nothing to wait for.
            fence::FENCE => alu_op(d, AluOp::Add, OpASrc::Zero, OpBSrc::Zero),
            fence::FENCE_I => {
                d.op_type = OpType::System;
                d.sys_op = SysOp::FenceI;
            }
            _ => return Err(illegal),
        },
        major::AMO => decode_amo(d, inst).ok_or(illegal)?,
        major::SYSTEM => decode_system(d, inst, ctx, illegal)?,
        _ => return Err(illegal),
    }
    Ok(())
}

fn alu_op(d: &mut DecodedInstruction, op: AluOp, a: OpASrc, b: OpBSrc) {
    d.op_type = OpType::Alu;
    d.alu_op = op;
    d.a_src = a;
    d.b_src = b;
}

fn read_rs1(d: &mut DecodedInstruction, rs1: usize) {
    d.rs1 = rs1;
    d.uses_rs1 = true;
}

fn read_rs2(d: &mut DecodedInstruction, rs2: usize) {
    d.rs2 = rs2;
    d.uses_rs2 = true;
}

fn decode_muldiv(d: &mut DecodedInstruction, f3: u32, word: bool) -> Option<()> {
    match f3 {
        muldiv::MUL => {
            d.op_type = OpType::Mul;
            d.mul_op = MulOp::Mul;
        }
        muldiv::MULH | muldiv::MULHSU | muldiv::MULHU if !word => {
            d.op_type = OpType::Mul;
            d.mul_op = match f3 {
                muldiv::MULH => MulOp::Mulh,
                muldiv::MULHSU => MulOp::Mulhsu,
                _ => MulOp::Mulhu,
            };
        }
        muldiv::DIV | muldiv::DIVU | muldiv::REM | muldiv::REMU => {
            d.op_type = OpType::Div;
            d.div_op = match f3 {
                muldiv::DIV => DivOp::Div,
                muldiv::DIVU => DivOp::Divu,
                muldiv::REM => DivOp::Rem,
                _ => DivOp::Remu,
            };
        }
        _ => return None,
    }
    Some(())
}

fn decode_amo(d: &mut DecodedInstruction, inst: u32) -> Option<()> {
    let width = match inst.funct3() {
        amo::WIDTH_W => MemWidth::Word,
        amo::WIDTH_D => MemWidth::Double,
        _ => return None,
    };
    let (kind, op) = match inst.funct5() {
        amo::LR if inst.rs2() == 0 => (MemKind::LoadReserved, AmoOp::Swap),
        amo::SC => (MemKind::StoreConditional, AmoOp::Swap),
        amo::SWAP => (MemKind::Amo, AmoOp::Swap),
        amo::ADD => (MemKind::Amo, AmoOp::Add),
        amo::XOR => (MemKind::Amo, AmoOp::Xor),
        amo::AND => (MemKind::Amo, AmoOp::And),
        amo::OR => (MemKind::Amo, AmoOp::Or),
        amo::MIN => (MemKind::Amo, AmoOp::Min),
        amo::MAX => (MemKind::Amo, AmoOp::Max),
        amo::MINU => (MemKind::Amo, AmoOp::Minu),
        amo::MAXU => (MemKind::Amo, AmoOp::Maxu),
        _ => return None,
    };
    d.op_type = OpType::Mem;
    d.mem = MemOp {
        kind,
        width,
        signed: true,
        amo: op,
    };
    d.rd = inst.rd();
    read_rs1(d, inst.rs1());
    if kind != MemKind::LoadReserved {
        read_rs2(d, inst.rs2());
    }
    Some(())
}

fn decode_system(
    d: &mut DecodedInstruction,
    inst: u32,
    ctx: &DecodeContext,
    illegal: Trap,
) -> Result<(), Trap> {
    let p = ctx.privilege;
    if inst.funct3() == sys_ops::PRIV {
        d.op_type = OpType::System;
        match inst {
            sys_ops::ECALL => {
                return Err(match p {
                    PrivilegeMode::User => Trap::EnvironmentCallFromUMode,
                    PrivilegeMode::Supervisor => Trap::EnvironmentCallFromSMode,
                    PrivilegeMode::Machine => Trap::EnvironmentCallFromMMode,
                });
            }
            sys_ops::EBREAK => return Err(Trap::Breakpoint(d.pc)),
            sys_ops::MRET if p == PrivilegeMode::Machine => d.sys_op = SysOp::Mret,
            sys_ops::SRET
                if p == PrivilegeMode::Machine || (p == PrivilegeMode::Supervisor && !ctx.tsr) =>
            {
                d.sys_op = SysOp::Sret;
            }
            sys_ops::WFI
                if p == PrivilegeMode::Machine || (p == PrivilegeMode::Supervisor && !ctx.tw) =>
            {
                d.sys_op = SysOp::Wfi;
            }
            _ if inst.funct7() == sys_ops::SFENCE_VMA_FUNCT7 && inst.rd() == 0 => {
                if p == PrivilegeMode::User || (p == PrivilegeMode::Supervisor && ctx.tvm) {
                    return Err(illegal);
                }
                d.sys_op = SysOp::SfenceVma;
                read_rs1(d, inst.rs1());
                read_rs2(d, inst.rs2());
            }
            _ => return Err(illegal),
        }
        return Ok(());
    }

    let op = match inst.funct3() {
        sys_ops::CSRRW => CsrOp::Rw,
        sys_ops::CSRRS => CsrOp::Rs,
        sys_ops::CSRRC => CsrOp::Rc,
        sys_ops::CSRRWI => CsrOp::Rwi,
        sys_ops::CSRRSI => CsrOp::Rsi,
        sys_ops::CSRRCI => CsrOp::Rci,
        _ => return Err(illegal),
    };
    let addr = inst.csr();
    let writes = op.writes(inst.rs1());
    if !csr::is_implemented(addr)
        || p < csr::required_privilege(addr)
        || (writes && csr::is_read_only(addr))
        || (addr == csr::SATP && p == PrivilegeMode::Supervisor && ctx.tvm)
    {
        return Err(illegal);
    }

    d.op_type = OpType::Csr;
    d.csr_op = op;
    d.csr_addr = addr;
    d.rd = inst.rd();
    if op.is_immediate() {
        d.rs1 = inst.rs1();
        d.imm = inst.rs1() as i64;
    } else {
        read_rs1(d, inst.rs1());
    }
    Ok(())
}

/// Performs the decode → execute-1 handoff.
///
/// Fires when fetch offers an instruction and the decode → execute-1 register
/// is empty; the source registers are read from the register file as the
/// record is stored.
///
/// # Returns
///
/// `true` if an instruction moved into `de_ex`.
pub fn decode_stage(
    fetched: &mut Latch<FetchedInstruction>,
    de_ex: &mut Latch<DecodedInstruction>,
    decoder: &dyn Decoder,
    ctx: &DecodeContext,
    regs: &RegisterFile,
    trace: bool,
) -> bool {
    transfer(fetched, de_ex, |f| {
        let mut d = decoder.decode(&f, ctx);
        d.rv1 = regs.read(d.rs1);
        d.rv2 = regs.read(d.rs2);
        if trace {
            trace!(
                target: "DE",
                "pc={:#x} {:?} rd=x{} rs1=x{} rs2=x{} imm={:#x}{}",
                d.pc,
                d.op_type,
                d.rd,
                d.rs1,
                d.rs2,
                d.imm,
                d.exception.map_or_else(String::new, |t| format!(" trap={t}"))
            );
        }
        d
    })
}
